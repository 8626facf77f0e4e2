mod blobs;
mod get_settings;
mod update_settings;

pub use blobs::{
    GetBlob, GetBlobHandler, GetBlobResponse, UploadBlob, UploadBlobHandler, UploadBlobResponse,
};
pub use get_settings::{GetSettings, GetSettingsHandler, GetSettingsResponse};
pub use update_settings::{
    SettingValues, UpdateSettings, UpdateSettingsHandler, UpdateSettingsResponse,
};
