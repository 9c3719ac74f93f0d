//! ATコマンドの組み立てと応答の解析

use log::debug;

/// SMS本文の終端（Ctrl-Z）
pub const CTRL_Z: u8 = 0x1A;

/// SMS入力の中断（ESC）
pub const ESC: u8 = 0x1B;

/// モデムに送るコマンド
#[derive(Debug, Clone, PartialEq)]
pub enum AtCommand<'a> {
    /// 疎通確認 `AT`
    Attention,
    /// テキストモード `AT+CMGF=1`
    TextMode,
    /// SMS送信開始 `AT+CMGS="<number>"`
    SendSms { number: &'a str },
}

impl AtCommand<'_> {
    /// 改行付きのコマンド文字列
    pub fn encode(&self) -> String {
        match self {
            AtCommand::Attention => "AT\r\n".to_string(),
            AtCommand::TextMode => "AT+CMGF=1\r\n".to_string(),
            AtCommand::SendSms { number } => format!("AT+CMGS=\"{}\"\r\n", number),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AtCommand::Attention => "AT",
            AtCommand::TextMode => "AT+CMGF",
            AtCommand::SendSms { .. } => "AT+CMGS",
        }
    }
}

/// SMS本文をCtrl-Z終端のバイト列にする
///
/// 本文中の制御文字 Ctrl-Z / ESC は送信を途中で確定・中断してしまうため取り除く。
pub fn encode_sms_body(message: &str) -> Vec<u8> {
    let mut body: Vec<u8> = message
        .bytes()
        .filter(|b| *b != CTRL_Z && *b != ESC)
        .collect();
    body.push(CTRL_Z);
    body
}

/// モデムからの応答
#[derive(Debug, Clone, PartialEq)]
pub enum AtResponse {
    Ok,
    Error,
    /// `+CMS ERROR: <code>`
    CmsError(u16),
    /// `+CME ERROR: <code>`
    CmeError(u16),
    /// 本文入力プロンプト `>`
    Prompt,
    /// `+CMGS: <mr>`
    MessageReference(u16),
    /// エコーや非同期通知など
    Other(String),
}

impl AtResponse {
    /// コマンドの失敗を示す最終応答か
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            AtResponse::Error | AtResponse::CmsError(_) | AtResponse::CmeError(_)
        )
    }
}

/// 1行分の応答を解析する
pub fn parse_response_line(line: &str) -> AtResponse {
    let trimmed = line.trim();

    match trimmed {
        "OK" => return AtResponse::Ok,
        "ERROR" => return AtResponse::Error,
        ">" => return AtResponse::Prompt,
        _ => {}
    }

    if let Some(code) = trimmed.strip_prefix("+CMS ERROR:") {
        if let Ok(code) = code.trim().parse::<u16>() {
            return AtResponse::CmsError(code);
        }
    }
    if let Some(code) = trimmed.strip_prefix("+CME ERROR:") {
        if let Ok(code) = code.trim().parse::<u16>() {
            return AtResponse::CmeError(code);
        }
    }
    if let Some(reference) = trimmed.strip_prefix("+CMGS:") {
        if let Ok(reference) = reference.trim().parse::<u16>() {
            return AtResponse::MessageReference(reference);
        }
    }

    AtResponse::Other(trimmed.to_string())
}

/// 受信バイト列を応答単位に区切るバッファ
///
/// プロンプト `> ` は改行を伴わないため、行頭の `>` を単独の応答として扱う。
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    pending: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 完成した応答を1つ取り出す
    pub fn next_response(&mut self) -> Option<AtResponse> {
        loop {
            let start = self
                .pending
                .iter()
                .position(|b| *b != b'\r' && *b != b'\n')
                .unwrap_or(self.pending.len());
            self.pending.drain(..start);

            if self.pending.first() == Some(&b'>') {
                let consumed = if self.pending.get(1) == Some(&b' ') { 2 } else { 1 };
                self.pending.drain(..consumed);
                return Some(AtResponse::Prompt);
            }

            let newline = self.pending.iter().position(|b| *b == b'\n')?;
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = parse_response_line(line);
            debug!("modem <- {:?}", response);
            return Some(response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_commands() {
        assert_eq!(AtCommand::Attention.encode(), "AT\r\n");
        assert_eq!(AtCommand::TextMode.encode(), "AT+CMGF=1\r\n");
        assert_eq!(
            AtCommand::SendSms { number: "+818012345678" }.encode(),
            "AT+CMGS=\"+818012345678\"\r\n"
        );
    }

    #[test]
    fn test_encode_sms_body_appends_ctrl_z() {
        assert_eq!(encode_sms_body("Full"), b"Full\x1a".to_vec());
    }

    #[test]
    fn test_encode_sms_body_strips_control_chars() {
        assert_eq!(encode_sms_body("a\x1ab\x1bc"), b"abc\x1a".to_vec());
    }

    #[test]
    fn test_parse_final_responses() {
        assert_eq!(parse_response_line("OK"), AtResponse::Ok);
        assert_eq!(parse_response_line("ERROR\r"), AtResponse::Error);
        assert_eq!(parse_response_line("+CMS ERROR: 500"), AtResponse::CmsError(500));
        assert_eq!(parse_response_line("+CME ERROR: 10"), AtResponse::CmeError(10));
        assert_eq!(parse_response_line("+CMGS: 42"), AtResponse::MessageReference(42));
    }

    #[test]
    fn test_parse_echo_is_other() {
        assert_eq!(
            parse_response_line("AT+CMGF=1"),
            AtResponse::Other("AT+CMGF=1".to_string())
        );
    }

    #[test]
    fn test_buffer_splits_lines_and_skips_blank() {
        let mut buffer = ResponseBuffer::new();
        buffer.push(b"AT\r\r\nOK\r\n");
        assert_eq!(buffer.next_response(), Some(AtResponse::Other("AT".to_string())));
        assert_eq!(buffer.next_response(), Some(AtResponse::Ok));
        assert_eq!(buffer.next_response(), None);
    }

    #[test]
    fn test_buffer_waits_for_complete_line() {
        let mut buffer = ResponseBuffer::new();
        buffer.push(b"\r\nO");
        assert_eq!(buffer.next_response(), None);
        buffer.push(b"K\r\n");
        assert_eq!(buffer.next_response(), Some(AtResponse::Ok));
    }

    #[test]
    fn test_buffer_detects_prompt_without_newline() {
        let mut buffer = ResponseBuffer::new();
        buffer.push(b"AT+CMGS=\"+81801234\"\r\r\n> ");
        assert!(matches!(buffer.next_response(), Some(AtResponse::Other(_))));
        assert_eq!(buffer.next_response(), Some(AtResponse::Prompt));
        assert!(buffer.is_empty());
    }
}
