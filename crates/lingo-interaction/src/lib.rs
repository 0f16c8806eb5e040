//! Backend access for lingo.
//!
//! Every backend call goes through [`ApiGateway`], which speaks the
//! command envelope protocol described in [`api_gateway`].

pub mod api_gateway;

pub use crate::api_gateway::{
    ApiGateway, BackendResponse, CommandEnvelope, CommandSender, ResponseStatus, decode_response,
    encode_request,
};
