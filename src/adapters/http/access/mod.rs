//! HTTP adapter for public proposal access endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CountersignRequest, CountersignResponse, ErrorResponse, RequestCodeRequest,
    RequestCodeResponse, UnlockedProposalResponse, VerifyCodeRequest,
};
pub use handlers::AccessHandlers;
pub use routes::access_routes;
