mod store;

pub use store::NotificationStore;
