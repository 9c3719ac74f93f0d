//! SMS送信の要求/応答ステートマシン
//!
//! 固定のdelayに頼らず、モデムの応答トークンで状態を進める。
//!
//! ```text
//! AwaitingPrompt --(>)--> AwaitingReference --(+CMGS)--> AwaitingOk --(OK)--> Sent
//!        |                        |                          |
//!        +------ ERROR / +CMS ERROR / +CME ERROR ------------+--> Failed
//!        +------ 期限切れ ----------------------------------------> TimedOut
//! ```

use super::at_command::AtResponse;

/// 送信失敗の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsFailure {
    Rejected,
    CmsError(u16),
    CmeError(u16),
}

impl std::fmt::Display for SmsFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmsFailure::Rejected => write!(f, "ERROR"),
            SmsFailure::CmsError(code) => write!(f, "+CMS ERROR: {}", code),
            SmsFailure::CmeError(code) => write!(f, "+CME ERROR: {}", code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsState {
    /// `AT+CMGS` 送信済み、プロンプト待ち
    AwaitingPrompt,
    /// 本文送信済み、`+CMGS: <mr>` 待ち
    AwaitingReference,
    /// メッセージ参照番号受信済み、`OK` 待ち
    AwaitingOk { reference: u16 },
    Sent { reference: Option<u16> },
    Failed(SmsFailure),
    TimedOut,
}

/// 状態遷移に伴ってドライバが行う操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsAction {
    None,
    /// 本文とCtrl-Zを送る
    SendBody,
    /// 入力中の本文をESCで破棄する
    Abort,
}

#[derive(Debug, Clone)]
pub struct SmsSession {
    state: SmsState,
}

impl Default for SmsSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SmsSession {
    pub fn new() -> Self {
        Self {
            state: SmsState::AwaitingPrompt,
        }
    }

    pub fn state(&self) -> SmsState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            SmsState::Sent { .. } | SmsState::Failed(_) | SmsState::TimedOut
        )
    }

    /// 現在の状態で待つべき時間（ミリ秒）
    ///
    /// 本文送信後はネットワーク送信を待つため長い方の期限を使う。
    pub fn timeout_ms(&self, response_timeout_ms: u32, send_timeout_ms: u32) -> u32 {
        match self.state {
            SmsState::AwaitingPrompt => response_timeout_ms,
            _ => send_timeout_ms,
        }
    }

    /// 応答を1つ受け取って状態を進める
    pub fn on_response(&mut self, response: &AtResponse) -> SmsAction {
        if self.is_finished() {
            return SmsAction::None;
        }

        if let Some(failure) = failure_of(response) {
            let action = if self.state == SmsState::AwaitingPrompt {
                SmsAction::None
            } else {
                SmsAction::Abort
            };
            self.state = SmsState::Failed(failure);
            return action;
        }

        match (self.state, response) {
            (SmsState::AwaitingPrompt, AtResponse::Prompt) => {
                self.state = SmsState::AwaitingReference;
                SmsAction::SendBody
            }
            (SmsState::AwaitingReference, AtResponse::MessageReference(reference)) => {
                self.state = SmsState::AwaitingOk {
                    reference: *reference,
                };
                SmsAction::None
            }
            // +CMGS を返さないモデムもある
            (SmsState::AwaitingReference, AtResponse::Ok) => {
                self.state = SmsState::Sent { reference: None };
                SmsAction::None
            }
            (SmsState::AwaitingOk { reference }, AtResponse::Ok) => {
                self.state = SmsState::Sent {
                    reference: Some(reference),
                };
                SmsAction::None
            }
            _ => SmsAction::None,
        }
    }

    /// 期限切れ
    pub fn on_timeout(&mut self) -> SmsAction {
        if self.is_finished() {
            return SmsAction::None;
        }
        self.state = SmsState::TimedOut;
        SmsAction::Abort
    }
}

fn failure_of(response: &AtResponse) -> Option<SmsFailure> {
    match response {
        AtResponse::Error => Some(SmsFailure::Rejected),
        AtResponse::CmsError(code) => Some(SmsFailure::CmsError(*code)),
        AtResponse::CmeError(code) => Some(SmsFailure::CmeError(*code)),
        _ => None,
    }
}
