use super::{SerialError, SerialPort, SerialResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// テスト用のシリアルモック実装
///
/// 実際のモデムを使わずにAT通信をシミュレートします。
/// 書き込まれたデータを記録し、書き込み内容に応じた応答を読み取りキューへ積みます。
#[derive(Debug, Clone, Default)]
pub struct MockSerial {
    /// 書き込まれたデータの記録
    pub sent_data: Arc<Mutex<Vec<Vec<u8>>>>,
    /// 読み取り用のデータキュー（先頭から取り出される）
    pub read_data_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
    /// 書き込みに含まれるバイト列 → 応答
    pub replies: Arc<Mutex<Vec<(Vec<u8>, Vec<u8>)>>>,
    /// エラーシミュレーション用のフラグ
    pub simulate_write_error: Arc<Mutex<bool>>,
    pub simulate_read_error: Arc<Mutex<bool>>,
}

impl MockSerial {
    /// 新しいMockSerialインスタンスを作成します
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用: 読み取り用データをキューに追加
    pub fn queue_read_data(&self, data: &[u8]) {
        self.read_data_queue.lock().unwrap().push_back(data.to_vec());
    }

    /// テスト用: `trigger` を含む書き込みに対して `reply` を返す
    ///
    /// 最初に一致したものだけが使われる。
    pub fn add_reply(&self, trigger: &[u8], reply: &[u8]) {
        self.replies
            .lock()
            .unwrap()
            .push((trigger.to_vec(), reply.to_vec()));
    }

    /// テスト用: 書き込まれたデータを取得
    pub fn get_sent_data(&self) -> Vec<Vec<u8>> {
        self.sent_data.lock().unwrap().clone()
    }

    /// テスト用: 書き込まれたデータを文字列として取得
    pub fn get_sent_strings(&self) -> Vec<String> {
        self.get_sent_data()
            .iter()
            .map(|data| String::from_utf8_lossy(data).to_string())
            .collect()
    }

    /// テスト用: 書き込みエラーをシミュレート
    pub fn set_write_error(&self, enable: bool) {
        *self.simulate_write_error.lock().unwrap() = enable;
    }

    /// テスト用: 読み取りエラーをシミュレート
    pub fn set_read_error(&self, enable: bool) {
        *self.simulate_read_error.lock().unwrap() = enable;
    }
}

impl SerialPort for MockSerial {
    fn write(&mut self, data: &[u8]) -> SerialResult<usize> {
        if *self.simulate_write_error.lock().unwrap() {
            return Err(SerialError::WriteError("Simulated write error".to_string()));
        }

        self.sent_data.lock().unwrap().push(data.to_vec());

        let replies = self.replies.lock().unwrap();
        let reply = replies.iter().find(|(trigger, _)| {
            !trigger.is_empty() && data.windows(trigger.len()).any(|w| w == trigger.as_slice())
        });
        if let Some((_, reply)) = reply {
            self.read_data_queue.lock().unwrap().push_back(reply.clone());
        }

        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8], _timeout_ms: u32) -> SerialResult<usize> {
        if *self.simulate_read_error.lock().unwrap() {
            return Err(SerialError::ReadError("Simulated read error".to_string()));
        }

        let mut queue = self.read_data_queue.lock().unwrap();
        match queue.pop_front() {
            Some(mut data) => {
                let len = data.len().min(buffer.len());
                buffer[..len].copy_from_slice(&data[..len]);
                // 入りきらなかった残りは次回に回す
                if len < data.len() {
                    queue.push_front(data.split_off(len));
                }
                Ok(len)
            }
            // データがない場合はタイムアウト
            None => Err(SerialError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_write_records_data() {
        let mut mock = MockSerial::new();
        assert_eq!(mock.write(b"AT\r\n").unwrap(), 4);
        assert_eq!(mock.get_sent_strings(), vec!["AT\r\n".to_string()]);
    }

    #[test]
    fn test_mock_reply_is_queued_on_matching_write() {
        let mut mock = MockSerial::new();
        mock.add_reply(b"AT\r", b"OK\r\n");

        mock.write(b"AT+CMGF=1\r\n").unwrap();
        let mut buffer = [0u8; 16];
        assert_eq!(mock.read(&mut buffer, 10), Err(SerialError::Timeout));

        mock.write(b"AT\r\n").unwrap();
        let len = mock.read(&mut buffer, 10).unwrap();
        assert_eq!(&buffer[..len], b"OK\r\n");
    }

    #[test]
    fn test_mock_read_splits_large_chunk() {
        let mut mock = MockSerial::new();
        mock.queue_read_data(b"0123456789");

        let mut buffer = [0u8; 4];
        assert_eq!(mock.read(&mut buffer, 10).unwrap(), 4);
        assert_eq!(&buffer, b"0123");
        assert_eq!(mock.read(&mut buffer, 10).unwrap(), 4);
        assert_eq!(mock.read(&mut buffer, 10).unwrap(), 2);
        assert_eq!(&buffer[..2], b"89");
    }

    #[test]
    fn test_mock_write_error() {
        let mut mock = MockSerial::new();
        mock.set_write_error(true);
        assert!(matches!(mock.write(b"AT"), Err(SerialError::WriteError(_))));
    }
}
