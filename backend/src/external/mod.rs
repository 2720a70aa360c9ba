//! External API integrations

pub mod supabase_auth;
pub mod supabase_rpc;

pub use supabase_auth::SupabaseAuthClient;
pub use supabase_rpc::SupabaseRpcClient;
