use std::time::Instant;

use log::debug;

/// Platform-agnostic sleep used between poll ticks.
pub trait TickSleeper {
    fn sleep_ms(&mut self, duration_ms: u32);
}

/// FreeRTOS delay based sleeper.
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub struct FreeRtosSleeper;

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
impl TickSleeper for FreeRtosSleeper {
    fn sleep_ms(&mut self, duration_ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(duration_ms);
    }
}

/// 処理時間を差し引いた次のティックまでの待ち時間
pub fn next_delay_ms(interval_ms: u32, elapsed_ms: u128) -> u32 {
    let elapsed_ms = elapsed_ms.min(interval_ms as u128) as u32;
    interval_ms - elapsed_ms
}

/// 一定間隔でコールバックを呼び出すポーリングタイマー
///
/// 同時に実行されるティックは常に1つだけ。
pub struct PollTimer<S: TickSleeper> {
    interval_ms: u32,
    sleeper: S,
}

impl<S: TickSleeper> PollTimer<S> {
    pub fn new(interval_ms: u32, sleeper: S) -> Self {
        Self {
            interval_ms,
            sleeper,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// 無限にティックを実行する
    pub fn run<F: FnMut()>(&mut self, mut on_tick: F) -> ! {
        loop {
            self.tick(&mut on_tick);
        }
    }

    /// 指定回数だけティックを実行する
    pub fn run_for<F: FnMut()>(&mut self, ticks: usize, mut on_tick: F) {
        for _ in 0..ticks {
            self.tick(&mut on_tick);
        }
    }

    fn tick<F: FnMut()>(&mut self, on_tick: &mut F) {
        let started = Instant::now();
        on_tick();
        let delay_ms = next_delay_ms(self.interval_ms, started.elapsed().as_millis());
        debug!("次のポーリングまで {} ms", delay_ms);
        if delay_ms > 0 {
            self.sleeper.sleep_ms(delay_ms);
        }
    }
}
