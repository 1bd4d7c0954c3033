pub mod recording_proxy;
