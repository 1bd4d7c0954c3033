pub mod binary_server;
