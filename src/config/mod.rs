pub mod settings;

pub use settings::{ApiSettings, AppSettings, PlayerSettings, Settings, TrackerSettings};
