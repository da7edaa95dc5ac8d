// ── Mutation requests ──

pub mod requests;
