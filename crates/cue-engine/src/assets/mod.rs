pub mod loading;

pub use loading::AssetState;
