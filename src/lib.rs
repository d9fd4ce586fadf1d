pub mod app;
pub mod config;
pub mod demo_seeder;
pub mod error;
pub mod auth {
    pub mod demo_auth;
    pub mod middleware;
    pub mod session;
    pub mod signed_request;
}
pub mod db {
    pub mod community_repository;
    pub mod counters;
    pub mod models;
    pub mod repository;
    pub mod user_repository;
}
pub mod messaging {
    pub mod client;
}
pub mod rendering {
    pub mod views;
}
pub mod routes;
