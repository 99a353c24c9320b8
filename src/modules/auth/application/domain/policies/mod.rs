pub mod lifecycle_policy;

pub use lifecycle_policy::LifecyclePolicy;
