use chrono::{prelude::*, Duration};
use portal_scheduler_domain::date;

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
    /// The current wall-clock time in the local offset of the host
    fn local_now(&self) -> DateTime<FixedOffset>;
    /// The instant a local wall-clock time refers to, in the offset in
    /// effect at that instant. `None` if the time does not exist locally.
    fn local_instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>>;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        let now = Local::now();
        now.with_timezone(now.offset())
    }

    fn local_instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        date::local_instant(&Local, date, time)
    }
}

/// System whose time starts at a fixed instant and then follows the tokio
/// clock. When the tokio clock is paused (`tokio::time::pause`) time only moves
/// when the runtime advances it, which makes timer driven code deterministic.
pub struct SimulatedSys {
    start: DateTime<FixedOffset>,
    origin: tokio::time::Instant,
}

impl SimulatedSys {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            origin: tokio::time::Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        let elapsed = tokio::time::Instant::now().duration_since(self.origin);
        Duration::milliseconds(elapsed.as_millis() as i64)
    }
}

impl ISys for SimulatedSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.local_now().timestamp_millis()
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        self.start + self.elapsed()
    }

    /// The simulated host never changes its offset
    fn local_instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        date::local_instant(self.start.offset(), date, time)
    }
}
