//! Supabase bindings: PostgREST snapshot reads and the realtime change channel.

pub mod dto;
pub mod realtime;
pub mod rest_client;

pub use realtime::{RealtimeSubscription, SupabaseRealtime};
pub use rest_client::SupabaseRestClient;
