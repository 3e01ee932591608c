mod activity_bus;

pub use activity_bus::{ActivityBus, ActivityBusError, ActivityListener, ListenerId};
