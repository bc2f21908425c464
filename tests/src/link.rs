use std::sync::Arc;
use std::time::Duration;

use arper_common::network::address_set::ExclusionPolicy;
use arper_common::network::compiler;
use arper_core::network::channel;
use arper_core::network::LinkClient;
use arper_core::responder::Responder;
use arper_protocols::arp;
use pnet::datalink::{dummy, NetworkInterface};
use pnet::packet::arp::ArpOperations;

use crate::mock::{ip, who_has, OUR_MAC, PEER_MAC};

/// Raw request bytes in, raw reply bytes out, through the real codec and
/// capture thread on a dummy interface.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn responder_answers_over_datalink() {
    let intf: NetworkInterface = dummy::dummy_interface(0);
    let mut dummy_cfg = dummy::Config::default();
    let inject = dummy_cfg.inject_handle().unwrap();
    let outbox = dummy_cfg.read_handle().unwrap();
    let handle = channel::start_capture_with(&intf, move |i, _| dummy::channel(i, dummy_cfg)).unwrap();

    let compiled = compiler::compile(["10.0.42.128/25"], ExclusionPolicy::default()).unwrap();
    let responder = Responder::new(Arc::new(LinkClient::from(handle)), Arc::new(compiled.set), OUR_MAC);
    let serving = tokio::spawn(async move { responder.run().await });

    for target in ["10.0.42.128", "10.0.42.129"] {
        let bytes = arp::encode(&who_has(ip(target)).message, pnet::util::MacAddr::broadcast()).unwrap();
        inject.send(Ok(bytes.into_boxed_slice())).unwrap();
    }

    let sent = tokio::task::spawn_blocking(move || outbox.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap()
        .expect("a reply should be written");
    serving.abort();

    let frame = arp::decode(&sent).unwrap();
    assert_eq!(sent.len(), 60);
    assert_eq!(frame.destination, PEER_MAC);
    assert_eq!(frame.source, OUR_MAC);
    assert_eq!(frame.message.operation, ArpOperations::Reply);
    assert_eq!(frame.message.sender_ip, ip("10.0.42.129"));
}
