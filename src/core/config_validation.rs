use level_core::{Calibration, LevelError};

/// ESP32 で使用可能な最大GPIO番号
pub const MAX_GPIO_PIN: u8 = 39;

/// 電話番号の桁数範囲（E.164 は最大15桁）
const PHONE_DIGITS_MIN: usize = 6;
const PHONE_DIGITS_MAX: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingWifiSsid,
    MissingBlynkToken,
    MissingPhoneNumber,
    InvalidPhoneNumber(String),
    InvalidCalibration(LevelError),
    InvalidAlertThreshold(f32),
    InvalidGpioPin(u8),
    DuplicateGpioPin(u8),
    ZeroDuration(&'static str),
}

pub fn validate_wifi_ssid(ssid: &str) -> Result<(), ValidationError> {
    if ssid.is_empty() {
        Err(ValidationError::MissingWifiSsid)
    } else {
        Ok(())
    }
}

pub fn validate_blynk_token(token: &str) -> Result<(), ValidationError> {
    if token.trim().is_empty() || token == "YOUR_BLYNK_TOKEN" {
        Err(ValidationError::MissingBlynkToken)
    } else {
        Ok(())
    }
}

/// SMS送信先の電話番号を検証し、前後の空白を除いた値を返す
///
/// 許可する形式: 先頭の `+` は任意、続けて6〜15桁の数字
pub fn parse_phone_number(number: &str) -> Result<String, ValidationError> {
    let trimmed = number.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingPhoneNumber);
    }

    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let valid = digits.chars().all(|c| c.is_ascii_digit())
        && (PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&digits.len());

    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidPhoneNumber(trimmed.to_string()))
    }
}

pub fn parse_calibration(
    empty_distance_cm: f32,
    full_distance_cm: f32,
) -> Result<Calibration, ValidationError> {
    Calibration::new(empty_distance_cm, full_distance_cm).map_err(ValidationError::InvalidCalibration)
}

pub fn parse_alert_threshold(threshold_percent: f32) -> Result<f32, ValidationError> {
    if (0.0..=100.0).contains(&threshold_percent) {
        Ok(threshold_percent)
    } else {
        Err(ValidationError::InvalidAlertThreshold(threshold_percent))
    }
}

pub fn parse_gpio_pin(pin: u8) -> Result<i32, ValidationError> {
    if pin <= MAX_GPIO_PIN {
        Ok(pin as i32)
    } else {
        Err(ValidationError::InvalidGpioPin(pin))
    }
}

/// 同じGPIOが複数の用途に割り当てられていないか確認
pub fn validate_distinct_pins(pins: &[u8]) -> Result<(), ValidationError> {
    for (i, pin) in pins.iter().enumerate() {
        if pins[i + 1..].contains(pin) {
            return Err(ValidationError::DuplicateGpioPin(*pin));
        }
    }
    Ok(())
}

pub fn parse_nonzero(value: u32, name: &'static str) -> Result<u32, ValidationError> {
    if value == 0 {
        Err(ValidationError::ZeroDuration(name))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blynk_token_rejects_empty_and_placeholder() {
        assert_eq!(validate_blynk_token(""), Err(ValidationError::MissingBlynkToken));
        assert_eq!(validate_blynk_token("   "), Err(ValidationError::MissingBlynkToken));
        assert_eq!(
            validate_blynk_token("YOUR_BLYNK_TOKEN"),
            Err(ValidationError::MissingBlynkToken)
        );
        assert!(validate_blynk_token("aBcD1234").is_ok());
    }

    #[test]
    fn test_phone_number_with_plus() {
        assert_eq!(
            parse_phone_number(" +818012345678 ").unwrap(),
            "+818012345678"
        );
    }

    #[test]
    fn test_phone_number_without_plus() {
        assert!(parse_phone_number("09012345678").is_ok());
    }

    #[test]
    fn test_phone_number_rejects_letters() {
        assert!(matches!(
            parse_phone_number("+81-80-1234"),
            Err(ValidationError::InvalidPhoneNumber(_))
        ));
    }

    #[test]
    fn test_phone_number_length_bounds() {
        assert!(parse_phone_number("12345").is_err());
        assert!(parse_phone_number("123456").is_ok());
        assert!(parse_phone_number("123456789012345").is_ok());
        assert!(parse_phone_number("1234567890123456").is_err());
    }

    #[test]
    fn test_empty_phone_number() {
        assert_eq!(parse_phone_number(""), Err(ValidationError::MissingPhoneNumber));
    }

    #[test]
    fn test_duplicate_pins() {
        assert_eq!(
            validate_distinct_pins(&[5, 18, 17, 5]),
            Err(ValidationError::DuplicateGpioPin(5))
        );
        assert!(validate_distinct_pins(&[5, 18, 17, 16]).is_ok());
    }
}
