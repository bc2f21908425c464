use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;

use arper_common::network::address_set::ExclusionPolicy;
use arper_common::network::compiler;
use arper_core::responder::Responder;
use arper_core::LinkError;
use arper_protocols::arp::ArpFrame;
use pnet::packet::arp::ArpOperations;
use pnet::util::MacAddr;

use crate::mock::{ip, who_has, MockClient, Sent, OUR_MAC, PEER_IP, PEER_MAC};

/// Compiles `tokens`, serves `frames` until the script runs dry and returns
/// the client for inspection.
async fn serve(tokens: &[&str], policy: ExclusionPolicy, hw: MacAddr, client: MockClient) -> Arc<MockClient> {
    let compiled = compiler::compile(tokens, policy).unwrap();
    let client = Arc::new(client);
    let responder = Responder::new(client.clone(), Arc::new(compiled.set), hw);

    let outcome = responder.run().await;
    assert!(matches!(outcome, Err(LinkError::Closed)), "unexpected end: {outcome:?}");

    client
}

fn requests(targets: &[&str]) -> Vec<Result<ArpFrame, LinkError>> {
    targets.iter().map(|t| Ok(who_has(ip(t)))).collect()
}

fn claimed(client: &MockClient) -> Vec<Ipv4Addr> {
    client.sent().iter().map(|s| s.message.sender_ip).collect()
}

fn assert_reply(sent: &Sent, hw: MacAddr, claimed: Ipv4Addr) {
    assert_eq!(sent.destination, PEER_MAC);
    assert_eq!(sent.message.operation, ArpOperations::Reply);
    assert_eq!(sent.message.sender_hw, hw);
    assert_eq!(sent.message.sender_ip, claimed);
    assert_eq!(sent.message.target_hw, PEER_MAC);
    assert_eq!(sent.message.target_ip, PEER_IP);
}

/*************************************************************
                     Range scenarios
**************************************************************/

#[tokio::test]
async fn network_range_claims_hosts_only() {
    let script = requests(&["10.0.42.128", "10.0.42.129", "10.0.42.200", "10.0.42.254", "10.0.42.255"]);
    let client = serve(&["10.0.42.128/25"], ExclusionPolicy::default(), OUR_MAC, MockClient::scripted(script)).await;

    assert_eq!(claimed(&client), vec![ip("10.0.42.129"), ip("10.0.42.200"), ip("10.0.42.254")]);
    for sent in client.sent() {
        assert_reply(&sent, OUR_MAC, sent.message.sender_ip);
    }
}

#[tokio::test]
async fn excluded_address_is_never_claimed() {
    let script = requests(&["10.0.42.141", "10.0.42.142", "10.0.42.143"]);
    let client = serve(
        &["10.0.42.128/25", "~10.0.42.142"],
        ExclusionPolicy::default(),
        OUR_MAC,
        MockClient::scripted(script),
    )
    .await;

    assert_eq!(claimed(&client), vec![ip("10.0.42.141"), ip("10.0.42.143")]);
}

#[tokio::test]
async fn include_network_claims_network_address_but_not_broadcast() {
    let policy = ExclusionPolicy {
        include_network: true,
        include_broadcast: false,
    };
    let script = requests(&["10.0.42.128", "10.0.42.255"]);
    let client = serve(&["10.0.42.128/25"], policy, OUR_MAC, MockClient::scripted(script)).await;

    assert_eq!(claimed(&client), vec![ip("10.0.42.128")]);
}

#[tokio::test]
async fn include_broadcast_claims_broadcast_address() {
    let policy = ExclusionPolicy {
        include_network: false,
        include_broadcast: true,
    };
    let script = requests(&["10.0.42.128", "10.0.42.255"]);
    let client = serve(&["10.0.42.128/25"], policy, OUR_MAC, MockClient::scripted(script)).await;

    assert_eq!(claimed(&client), vec![ip("10.0.42.255")]);
}

#[tokio::test]
async fn single_address_with_overridden_hardware_address() {
    let spoofed = MacAddr::new(0x02, 0x00, 0x5e, 0x10, 0x00, 0x01);
    let script = requests(&["10.0.42.41", "10.0.42.42", "10.0.42.43"]);
    let client = serve(&["10.0.42.42"], ExclusionPolicy::default(), spoofed, MockClient::scripted(script)).await;

    let sent = client.sent();
    assert_eq!(sent.len(), 1);
    assert_reply(&sent[0], spoofed, ip("10.0.42.42"));
}

#[tokio::test]
async fn excluded_subnet_inside_range() {
    let script = requests(&["10.0.0.1", "10.0.0.10", "10.0.0.20", "10.0.0.200"]);
    let client = serve(
        &["10.0.0.0/24", "~10.0.0.0/28"],
        ExclusionPolicy::default(),
        OUR_MAC,
        MockClient::scripted(script),
    )
    .await;

    assert_eq!(claimed(&client), vec![ip("10.0.0.20"), ip("10.0.0.200")]);
}

/*************************************************************
                       Link filtering
**************************************************************/

#[tokio::test]
async fn requests_unicast_to_another_station_are_ignored() {
    let mut elsewhere = who_has(ip("10.0.42.129"));
    elsewhere.destination = MacAddr::new(0x02, 0, 0, 0, 0, 0x99);
    let mut direct = who_has(ip("10.0.42.130"));
    direct.destination = OUR_MAC;

    let client = serve(
        &["10.0.42.128/25"],
        ExclusionPolicy::default(),
        OUR_MAC,
        MockClient::scripted([Ok(elsewhere), Ok(direct)]),
    )
    .await;

    assert_eq!(claimed(&client), vec![ip("10.0.42.130")]);
}

#[tokio::test]
async fn replies_are_not_answered() {
    let mut reply = who_has(ip("10.0.42.129"));
    reply.message.operation = ArpOperations::Reply;

    let client = serve(
        &["10.0.42.128/25"],
        ExclusionPolicy::default(),
        OUR_MAC,
        MockClient::scripted([Ok(reply)]),
    )
    .await;

    assert!(client.sent().is_empty());
}

/*************************************************************
                       Fault tolerance
**************************************************************/

#[tokio::test]
async fn read_errors_do_not_stop_the_loop() {
    let script = vec![
        Err(LinkError::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))),
        Err(LinkError::Malformed("truncated".into())),
        Ok(who_has(ip("10.0.42.129"))),
    ];
    let client = serve(&["10.0.42.128/25"], ExclusionPolicy::default(), OUR_MAC, MockClient::scripted(script)).await;

    assert_eq!(claimed(&client), vec![ip("10.0.42.129")]);
}

#[tokio::test]
async fn failed_reply_does_not_stop_the_loop() {
    let script = requests(&["10.0.42.130", "10.0.42.131"]);
    let client = MockClient::scripted(script).fail_writes_for(ip("10.0.42.130"));
    let client = serve(&["10.0.42.128/25"], ExclusionPolicy::default(), OUR_MAC, client).await;

    assert_eq!(claimed(&client), vec![ip("10.0.42.131")]);
}
