use {
    chrono::{Local, NaiveDateTime},
    log::debug,
    serde::{Deserialize, Serialize},
    std::time::Duration,
    tokio::{sync::watch, task::JoinHandle, time},
};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Refresh period used by the site
pub const TICK: Duration = Duration::from_millis(1_000);

/// Time left until the target, never negative
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeRemaining {
    pub fn between(target: NaiveDateTime, now: NaiveDateTime) -> Self {
        let delta = (target - now).num_milliseconds();
        if delta <= 0 {
            return Self::default();
        }
        Self {
            days: (delta / MS_PER_DAY) as u64,
            hours: (delta / MS_PER_HOUR % 24) as u8,
            minutes: (delta / MS_PER_MINUTE % 60) as u8,
            seconds: (delta / MS_PER_SECOND % 60) as u8,
        }
    }

    /// Time remaining from the local wall clock
    pub fn until(target: NaiveDateTime) -> Self {
        Self::between(target, Local::now().naive_local())
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400
            + u64::from(self.hours) * 3_600
            + u64::from(self.minutes) * 60
            + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A repeating countdown publisher.
///
/// The clock owns its timer task; dropping the clock cancels the task, so a
/// clock should live exactly as long as whatever is displaying it.
pub struct CountdownClock {
    receiver: watch::Receiver<TimeRemaining>,
    task: JoinHandle<()>,
}

impl CountdownClock {
    /// Start ticking on the current runtime. The first tick fires immediately.
    pub fn start(target: NaiveDateTime, period: Duration) -> Self {
        let (sender, receiver) = watch::channel(TimeRemaining::until(target));
        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            loop {
                interval.tick().await;
                if sender.send(TimeRemaining::until(target)).is_err() {
                    break;
                }
            }
        });
        debug!("Countdown clock started for {}", target);
        Self { receiver, task }
    }

    /// Most recently published value
    pub fn current(&self) -> TimeRemaining {
        *self.receiver.borrow()
    }

    /// An extra observer; it sees the channel close once the clock is dropped
    pub fn subscribe(&self) -> watch::Receiver<TimeRemaining> {
        self.receiver.clone()
    }

    /// Wait for the next published value, `None` once the timer has stopped
    pub async fn next_tick(&mut self) -> Option<TimeRemaining> {
        self.receiver.changed().await.ok()?;
        let remaining = *self.receiver.borrow_and_update();
        Some(remaining)
    }
}

impl Drop for CountdownClock {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Countdown clock stopped");
    }
}

#[cfg(test)]
mod tests {
    use {super::*, chrono::NaiveDate};

    fn at(day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn exact_day() {
        let remaining = TimeRemaining::between(at(2, 0, 0, 0), at(1, 0, 0, 0));
        assert_eq!(
            remaining,
            TimeRemaining {
                days: 1,
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn mixed_fields() {
        let target = at(2, 0, 0, 0);
        let now = NaiveDate::from_ymd_opt(2026, 4, 28)
            .unwrap()
            .and_hms_milli_opt(20, 44, 29, 250)
            .unwrap();
        let remaining = TimeRemaining::between(target, now);
        assert_eq!(remaining.days, 3);
        assert_eq!(remaining.hours, 3);
        assert_eq!(remaining.minutes, 15);
        assert_eq!(remaining.seconds, 30);
    }

    #[test]
    fn past_and_present_are_zero() {
        let target = at(2, 0, 0, 0);
        assert!(TimeRemaining::between(target, target).is_zero());
        assert!(TimeRemaining::between(target, at(2, 0, 0, 1)).is_zero());
        assert!(TimeRemaining::between(target, at(20, 13, 0, 0)).is_zero());
    }

    #[test]
    fn fields_bound_the_delta() {
        let target = at(2, 0, 0, 0);
        let start = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        // walk a few hundred awkward offsets across more than a year
        let mut offset_ms: i64 = 0;
        while offset_ms < 500 * MS_PER_DAY {
            let now = start + chrono::Duration::milliseconds(offset_ms);
            let delta_ms = (target - now).num_milliseconds();
            let remaining = TimeRemaining::between(target, now);
            if delta_ms > 0 {
                let total = remaining.total_seconds() as i64;
                assert!(total * 1_000 <= delta_ms);
                assert!(delta_ms < (total + 1) * 1_000);
                assert!(remaining.hours < 24);
                assert!(remaining.minutes < 60);
                assert!(remaining.seconds < 60);
            } else {
                assert!(remaining.is_zero());
            }
            offset_ms += 7_919_017;
        }
    }

    #[test]
    fn serializes_all_fields() {
        let json = serde_json::to_value(TimeRemaining {
            days: 4,
            hours: 3,
            minutes: 2,
            seconds: 1,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"days": 4, "hours": 3, "minutes": 2, "seconds": 1})
        );
    }

    #[actix_rt::test]
    async fn clock_publishes() {
        let target = Local::now().naive_local() + chrono::Duration::days(3);
        let mut clock = CountdownClock::start(target, Duration::from_millis(10));
        let first = clock.next_tick().await.unwrap();
        assert_eq!(first.days, 2);
        let second = clock.next_tick().await.unwrap();
        assert!(second.total_seconds() <= first.total_seconds());
    }

    #[actix_rt::test]
    async fn clock_past_target_stays_zero() {
        let target = Local::now().naive_local() - chrono::Duration::hours(1);
        let mut clock = CountdownClock::start(target, Duration::from_millis(10));
        assert!(clock.current().is_zero());
        assert!(clock.next_tick().await.unwrap().is_zero());
    }

    #[actix_rt::test]
    async fn dropping_clock_stops_timer() {
        let target = Local::now().naive_local() + chrono::Duration::days(1);
        let clock = CountdownClock::start(target, Duration::from_millis(10));
        let mut observer = clock.subscribe();
        drop(clock);
        let drained = time::timeout(Duration::from_secs(5), async {
            while observer.changed().await.is_ok() {}
        })
        .await;
        assert!(drained.is_ok());
    }
}
