pub mod traffic_server;
