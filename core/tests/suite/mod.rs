mod common;
mod contact_flow;
mod field_protocol;
