mod configuration_user_values;
mod create_configuration;
mod delete_configuration;
mod duplicate_configuration;
mod extensions;
mod get_configurations;
mod update_configuration;

pub use configuration_user_values::{
    GetConfigurationUserValues, GetConfigurationUserValuesHandler,
    GetConfigurationUserValuesResponse, UpdateConfigurationUserValues,
    UpdateConfigurationUserValuesHandler, UpdateConfigurationUserValuesResponse,
};
pub use create_configuration::{
    ConfigurationValues, CreateConfiguration, CreateConfigurationHandler,
    CreateConfigurationResponse,
};
pub use delete_configuration::{
    DeleteConfiguration, DeleteConfigurationHandler, DeleteConfigurationResponse,
};
pub use duplicate_configuration::{
    DuplicateConfiguration, DuplicateConfigurationHandler, DuplicateConfigurationResponse,
};
pub use extensions::{
    CreateExtension, CreateExtensionHandler, CreateExtensionResponse, DeleteExtension,
    DeleteExtensionHandler, DeleteExtensionResponse, ExtensionValues, GetExtensions,
    GetExtensionsHandler, GetExtensionsResponse, UpdateExtension, UpdateExtensionHandler,
    UpdateExtensionResponse,
};
pub use get_configurations::{
    GetConfigurations, GetConfigurationsHandler, GetConfigurationsResponse,
};
pub use update_configuration::{
    UpdateConfiguration, UpdateConfigurationHandler, UpdateConfigurationResponse,
};
