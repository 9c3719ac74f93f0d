// HC-SR04 Driver Tests
// 仮想クロックとモックピンで、トリガー波形とエコー幅の測定をホスト上で検証します

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use garbage_level_monitor::hardware::{HcSr04, MicrosClock};
use level_core::{measure, EchoProbe, LevelError, ProbeError};

/// 共有の仮想時刻（µs）
type VirtualTime = Rc<Cell<u64>>;

/// 呼ばれるたびに1µs進むクロック
struct StepClock(VirtualTime);

impl MicrosClock for StepClock {
    fn now_us(&mut self) -> u64 {
        let now = self.0.get();
        self.0.set(now + 1);
        now
    }
}

/// 仮想時刻を進めるディレイ
struct VirtualDelay(VirtualTime);

impl DelayNs for VirtualDelay {
    fn delay_ns(&mut self, ns: u32) {
        let us = (ns as u64).div_ceil(1000);
        self.0.set(self.0.get() + us);
    }
}

/// 状態変化を (時刻, レベル) で記録するトリガーピン
struct RecordingTrig {
    time: VirtualTime,
    edges: Rc<RefCell<Vec<(u64, bool)>>>,
}

impl ErrorType for RecordingTrig {
    type Error = Infallible;
}

impl OutputPin for RecordingTrig {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.edges.borrow_mut().push((self.time.get(), false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.edges.borrow_mut().push((self.time.get(), true));
        Ok(())
    }
}

/// 指定区間だけHIGHになるエコーピン
struct ScriptedEcho {
    time: VirtualTime,
    high_windows: Vec<(u64, u64)>,
}

impl ErrorType for ScriptedEcho {
    type Error = Infallible;
}

impl InputPin for ScriptedEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let now = self.time.get();
        Ok(self
            .high_windows
            .iter()
            .any(|&(rise, fall)| now >= rise && now < fall))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// 常に失敗するピン
struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = ErrorKind;
}

impl InputPin for BrokenPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }
}

fn sensor(
    high_windows: &[(u64, u64)],
) -> (
    HcSr04<RecordingTrig, ScriptedEcho, VirtualDelay, StepClock>,
    Rc<RefCell<Vec<(u64, bool)>>>,
) {
    let time: VirtualTime = Rc::new(Cell::new(0));
    let edges = Rc::new(RefCell::new(Vec::new()));
    let trig = RecordingTrig {
        time: time.clone(),
        edges: edges.clone(),
    };
    let echo = ScriptedEcho {
        time: time.clone(),
        high_windows: high_windows.to_vec(),
    };
    (
        HcSr04::new(trig, echo, VirtualDelay(time.clone()), StepClock(time)),
        edges,
    )
}

#[test]
fn test_trigger_waveform() {
    let (mut sensor, edges) = sensor(&[(100, 1100)]);
    sensor.trigger_and_wait_echo(30_000).unwrap();

    // LOW → 2µs → HIGH → 10µs → LOW
    assert_eq!(*edges.borrow(), vec![(0, false), (2, true), (12, false)]);
}

#[test]
fn test_measures_echo_width() {
    let (mut sensor, _) = sensor(&[(100, 1100)]);
    let width = sensor.trigger_and_wait_echo(30_000).unwrap();
    assert!((999..=1001).contains(&width), "width = {}", width);
}

#[test]
fn test_measure_1000us_echo_is_about_17cm() {
    let (mut sensor, _) = sensor(&[(500, 1500)]);
    let (raw, distance) = measure(&mut sensor, 30_000).unwrap();
    assert!((999..=1001).contains(&raw));
    assert!((distance - 17.0).abs() < 0.05);
}

#[test]
fn test_no_echo_times_out() {
    let (mut sensor, _) = sensor(&[]);
    assert_eq!(sensor.trigger_and_wait_echo(5_000), Err(ProbeError::Timeout));
}

#[test]
fn test_echo_longer_than_timeout_times_out() {
    let (mut sensor, _) = sensor(&[(100, 50_000)]);
    assert_eq!(sensor.trigger_and_wait_echo(30_000), Err(ProbeError::Timeout));
}

#[test]
fn test_echo_already_high_is_not_measured() {
    // トリガー前からHIGHのまま残っているパルスは測定しない
    let (mut sensor, _) = sensor(&[(0, 300)]);
    assert_eq!(sensor.trigger_and_wait_echo(30_000), Err(ProbeError::Timeout));
}

#[test]
fn test_stuck_high_echo_times_out() {
    let (mut sensor, _) = sensor(&[(0, u64::MAX)]);
    assert_eq!(measure(&mut sensor, 30_000), Err(LevelError::SensorTimeout));
}

#[test]
fn test_leftover_pulse_is_skipped_before_fresh_echo() {
    let (mut sensor, _) = sensor(&[(0, 300), (500, 1500)]);
    let width = sensor.trigger_and_wait_echo(30_000).unwrap();
    assert!((999..=1001).contains(&width), "width = {}", width);
}

#[test]
fn test_timeout_maps_to_sensor_timeout() {
    let (mut sensor, _) = sensor(&[]);
    assert_eq!(measure(&mut sensor, 1_000), Err(LevelError::SensorTimeout));
}

#[test]
fn test_pin_error_is_hardware_fault() {
    let time: VirtualTime = Rc::new(Cell::new(0));
    let trig = RecordingTrig {
        time: time.clone(),
        edges: Rc::new(RefCell::new(Vec::new())),
    };
    let mut sensor = HcSr04::new(trig, BrokenPin, VirtualDelay(time.clone()), StepClock(time));

    assert_eq!(sensor.trigger_and_wait_echo(30_000), Err(ProbeError::Hardware));
    assert_eq!(measure(&mut sensor, 30_000), Err(LevelError::SensorFault));
}
