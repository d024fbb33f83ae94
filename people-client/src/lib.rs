//! HTTP client for the Google People API, implementing
//! [`martin_core::DirectorySync`].

mod client;

pub use client::PeopleClient;
