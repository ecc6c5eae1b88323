mod loader;
pub use loader::LoaderCredentialProvider;

mod static_provider;
pub use static_provider::StaticCredentialProvider;
