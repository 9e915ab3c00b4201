/// Persistence abstraction for hunts, sessions, and discoveries.
pub mod hunt_store;
/// Entities shared between the storage backends and the service layer.
pub mod models;
/// Backend-agnostic storage errors.
pub mod storage;
