pub mod engine;
pub mod media;
pub mod test_app;
pub mod transcode;
