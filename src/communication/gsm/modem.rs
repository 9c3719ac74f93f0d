use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::at_command::{encode_sms_body, AtCommand, AtResponse, ResponseBuffer, ESC};
use super::serial::{SerialError, SerialPort};
use super::sms_session::{SmsAction, SmsFailure, SmsSession, SmsState};
use crate::communication::alert::{AlertDispatcher, AlertError};

/// 1回の読み取りで受け取る最大バイト数
const READ_CHUNK_SIZE: usize = 128;

/// モデム操作のエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModemError {
    #[error("serial error: {0}")]
    Serial(#[from] SerialError),
    #[error("{0} timed out waiting for modem response")]
    Timeout(&'static str),
    #[error("{command} rejected by modem: {response:?}")]
    Rejected {
        command: &'static str,
        response: AtResponse,
    },
    #[error("SMS send failed: {0}")]
    SmsFailed(SmsFailure),
}

/// 応答待ち時間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemTimeouts {
    /// 通常のATコマンド
    pub response_ms: u32,
    /// 本文送信後の `+CMGS` / `OK`
    pub sms_send_ms: u32,
}

/// ATコマンドで制御するGSMモデム
pub struct GsmModem<S: SerialPort> {
    serial: S,
    buffer: ResponseBuffer,
    timeouts: ModemTimeouts,
}

impl<S: SerialPort> GsmModem<S> {
    pub fn new(serial: S, timeouts: ModemTimeouts) -> Self {
        Self {
            serial,
            buffer: ResponseBuffer::new(),
            timeouts,
        }
    }

    /// 疎通確認とテキストモード設定
    pub fn initialize(&mut self) -> Result<(), ModemError> {
        info!("Initializing GSM modem...");
        self.command(AtCommand::Attention)?;
        self.command(AtCommand::TextMode)?;
        info!("GSM modem ready (text mode)");
        Ok(())
    }

    /// コマンドを送り、`OK` を待つ
    pub fn command(&mut self, command: AtCommand<'_>) -> Result<(), ModemError> {
        self.send_command(&command)?;
        let deadline = deadline_after(self.timeouts.response_ms);

        loop {
            match self.next_response(deadline)? {
                Some(AtResponse::Ok) => return Ok(()),
                Some(response) if response.is_error() => {
                    return Err(ModemError::Rejected {
                        command: command.name(),
                        response,
                    });
                }
                Some(_) => continue,
                None => return Err(ModemError::Timeout(command.name())),
            }
        }
    }

    /// SMSを送信する
    ///
    /// # Returns
    /// モデムが返したメッセージ参照番号（返さないモデムでは `None`）
    pub fn send_sms(&mut self, number: &str, message: &str) -> Result<Option<u16>, ModemError> {
        let command = AtCommand::SendSms { number };
        self.send_command(&command)?;

        let mut session = SmsSession::new();
        let mut deadline = deadline_after(
            session.timeout_ms(self.timeouts.response_ms, self.timeouts.sms_send_ms),
        );

        while !session.is_finished() {
            let action = match self.next_response(deadline)? {
                Some(response) => session.on_response(&response),
                None => session.on_timeout(),
            };

            match action {
                SmsAction::SendBody => {
                    debug!("modem -> SMS body ({} bytes)", message.len());
                    self.serial.write(&encode_sms_body(message))?;
                    deadline = deadline_after(
                        session.timeout_ms(self.timeouts.response_ms, self.timeouts.sms_send_ms),
                    );
                }
                SmsAction::Abort => {
                    if let Err(e) = self.serial.write(&[ESC]) {
                        warn!("Failed to abort SMS input: {}", e);
                    }
                }
                SmsAction::None => {}
            }
        }

        match session.state() {
            SmsState::Sent { reference } => Ok(reference),
            SmsState::Failed(failure) => Err(ModemError::SmsFailed(failure)),
            _ => Err(ModemError::Timeout(command.name())),
        }
    }

    fn send_command(&mut self, command: &AtCommand<'_>) -> Result<(), ModemError> {
        // 前のやり取りの残りは捨てる
        self.buffer.clear();
        let encoded = command.encode();
        debug!("modem -> {}", encoded.trim_end());
        self.serial.write(encoded.as_bytes())?;
        Ok(())
    }

    /// 期限までに応答を1つ読む。期限切れなら `None`
    fn next_response(&mut self, deadline: Instant) -> Result<Option<AtResponse>, ModemError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            if let Some(response) = self.buffer.next_response() {
                return Ok(Some(response));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            let remaining_ms = remaining.as_millis().clamp(1, u32::MAX as u128) as u32;

            match self.serial.read(&mut chunk, remaining_ms) {
                Ok(bytes_read) => self.buffer.push(&chunk[..bytes_read]),
                Err(SerialError::Timeout) => return Ok(None),
                Err(e) => return Err(ModemError::Serial(e)),
            }
        }
    }
}

fn deadline_after(timeout_ms: u32) -> Instant {
    Instant::now() + Duration::from_millis(timeout_ms as u64)
}

/// GSMモデム経由のSMSアラート
pub struct SmsAlerter<S: SerialPort> {
    modem: GsmModem<S>,
    phone_number: String,
}

impl<S: SerialPort> SmsAlerter<S> {
    pub fn new(modem: GsmModem<S>, phone_number: String) -> Self {
        Self {
            modem,
            phone_number,
        }
    }
}

impl<S: SerialPort> AlertDispatcher for SmsAlerter<S> {
    fn send_alert(&mut self, message: &str) -> Result<(), AlertError> {
        match self.modem.send_sms(&self.phone_number, message) {
            Ok(reference) => {
                info!("SMS alert sent (reference: {:?})", reference);
                Ok(())
            }
            Err(e) => Err(AlertError::DispatchFailed(e.to_string())),
        }
    }
}
