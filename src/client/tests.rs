//! Unit tests for the client endpoint.

use super::{Client, ClientError, SocketOptions};
use crate::frame::Frame;

#[test]
fn fresh_client_is_not_connected() {
    let client: Client<u32> = Client::new();
    assert!(!client.is_connected());
    assert!(client.incoming().is_empty());
}

#[test]
fn send_without_a_connection_is_dropped() {
    let client: Client<u32> = Client::new();
    let mut frame = Frame::new(7u32);
    frame.push(1u8);
    client.send(frame);
    assert!(client.incoming().is_empty());
}

#[test]
fn disconnect_without_a_connection_is_a_no_op() {
    let mut client: Client<u32> = Client::new();
    client.disconnect();
    assert!(!client.is_connected());
}

#[test]
fn connect_to_an_unresolvable_host_fails() {
    let mut client: Client<u32> = Client::new();
    let err = client
        .connect("host.invalid", 1)
        .expect_err("reserved TLD must not resolve");
    assert!(matches!(
        err,
        ClientError::Resolve(_) | ClientError::NoAddresses { .. }
    ));
    assert!(!client.is_connected());
}

#[test]
fn socket_options_builder_is_value_comparable() {
    let options = SocketOptions::default().nodelay(true).ttl(64);
    assert_eq!(options, SocketOptions::default().nodelay(true).ttl(64));
    assert_ne!(options, SocketOptions::default());
}
