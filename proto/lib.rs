//! Messages and Connect stubs of the `gitpod.experimental.v1` public API.
//!
//! Each service lives in a `<service>_connect` module next to its messages:
//!
//! * [`v1::projects_service_connect`]
//! * [`v1::stats_service_connect`]

pub mod gitpod {
    pub mod experimental {
        pub mod v1 {
            include!("gen/gitpod.experimental.v1.rs");
        }
    }
}

pub use gitpod::experimental::v1;
