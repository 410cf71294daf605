pub use norma_models::{
    IntervalResponse, SettingsResponse, UpdateIntervalRequest, UpdateSettingsRequest,
    UserSettings,
};
