//! Compiles the bindings generated for every file under `fixtures/` and
//! checks their wire behavior over an in-process transport.

include!(concat!(env!("OUT_DIR"), "/foo.rs"));
include!(concat!(env!("OUT_DIR"), "/clash.rs"));
include!(concat!(env!("OUT_DIR"), "/types_only.rs"));


#[cfg(test)]
mod clash_tests {
    use serde_json::json;
    use varlink_codegen::rpc;

    use super::clash;

    struct Echo;

    impl clash::Backend for Echo {
        fn get(&self, input: clash::GetIn) -> Result<clash::GetOut, clash::Error_> {
            Ok(clash::GetOut {
                option: input.q.map(|key| clash::Option { key }),
                result: clash::Result { ok: true },
                error: None,
                mode: clash::Mode::Self_,
            })
        }

        fn new_(&self, _input: clash::NewIn) -> Result<clash::NewOut, clash::Error_> {
            Ok(clash::NewOut {})
        }
    }

    fn client() -> clash::Client_<rpc::Loopback<clash::Handler<Echo>>> {
        clash::Client_::new(rpc::Loopback::new(clash::Handler::new(Echo)))
    }

    #[test]
    fn prelude_named_types_round_trip() {
        let out = client().get(Some(clash::GetIn { q: Some("k".into()) })).unwrap();
        assert_eq!(out.option, Some(clash::Option { key: "k".into() }));
        assert_eq!(out.result, clash::Result { ok: true });

        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value, json!({ "option": { "key": "k" }, "result": { "ok": true }, "mode": "self" }));

        let out = client().get(None).unwrap();
        assert_eq!(out.option, None);
    }

    #[test]
    fn declared_error_type_is_a_plain_record() {
        let error = clash::Error { message: "boom".into() };
        assert_eq!(serde_json::to_value(&error).unwrap(), json!({ "message": "boom" }));
        assert_eq!(client().new_(None).unwrap(), clash::NewOut {});
    }

    #[test]
    fn interface_without_errors_passes_every_failure_through() {
        let wire = rpc::WireError::new("org.example.Clash.Anything", json!({}));
        match clash::Error_::from_wire(wire.clone()) {
            Err(rpc::Error::Remote(passed)) => assert_eq!(passed, wire),
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn normalized_names_stay_distinct() {
        let pair = clash::Pair { foo_bar: 1, foo_bar_: 2 };
        assert_eq!(serde_json::to_value(&pair).unwrap(), json!({ "fooBar": 1, "foo_bar": 2 }));

        assert_eq!(clash::Mode::DarkBlue.as_str(), "dark_blue");
        assert_eq!(clash::Mode::DarkBlue_.as_str(), "darkBlue");
        let mode: clash::Mode = serde_json::from_value(json!("self")).unwrap();
        assert_eq!(mode, clash::Mode::Self_);
    }

    #[test]
    fn hoisted_record_does_not_replace_declared_one() {
        let shape = clash::Shape { style: clash::ShapeStyle_ { width: 2.0 } };
        assert_eq!(serde_json::to_value(&shape).unwrap(), json!({ "style": { "width": 2.0 } }));
        let declared = clash::ShapeStyle { name: "bold".into() };
        assert_eq!(serde_json::to_value(&declared).unwrap(), json!({ "name": "bold" }));

        let vec = clash::Vec { items: vec![1, 2] };
        assert_eq!(serde_json::to_value(&vec).unwrap(), json!({ "items": [1, 2] }));
        assert_eq!(serde_json::to_value(clash::String {}).unwrap(), json!({}));
        assert_eq!(serde_json::to_value(clash::Client {}).unwrap(), json!({}));
    }
}

#[cfg(test)]
mod types_only_tests {
    use serde_json::json;
    use varlink_codegen::rpc::{self, Service, Transport};

    use super::types_only;

    struct Nothing;

    impl types_only::Backend for Nothing {}

    #[test]
    fn every_method_is_unknown() {
        let handler = types_only::Handler::new(Nothing);
        let err = handler.dispatch("org.example.Types.Anything", json!({})).unwrap_err();
        assert_eq!(err.wire().map(|w| w.name.as_str()), Some(rpc::METHOD_NOT_FOUND));
    }

    #[test]
    fn client_builds_without_operations() {
        let client = types_only::Client::new(rpc::Loopback::new(types_only::Handler::new(Nothing)));
        assert!(client.transport().call("org.example.Types.Anything", json!({})).is_err());

        let point = types_only::Point { x: 1, y: 2 };
        assert_eq!(serde_json::to_value(&point).unwrap(), json!({ "x": 1, "y": 2 }));
    }
}
