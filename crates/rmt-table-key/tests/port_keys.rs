//! Integration tests for the port table key objects.

use pretty_assertions::assert_eq;
use rmt_table_key::{
    FieldData, FieldKey, FixedWidthKey, KeyError, KeyFieldInfo, KeyFieldValue, KeyResultExt,
    MatchType, PortCfgKey, PortFpIdxInfoKey, PortHdlInfoKey, PortStatKey, PortStrInfoKey,
    TableInfo, TableKey, TdiStatus,
};
use rmt_types::{DevPort, FrontPanelIndex, PortHandle};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn generic_value_roundtrip() {
    let table = TableInfo::port_cfg();
    let mut key = PortCfgKey::new(&table).unwrap();
    for v in [0u64, 1, 0x104, 0xdead_beef, u64::from(u32::MAX)] {
        key.set_value(1, &KeyFieldValue::exact_int(v)).unwrap();
        let mut out = KeyFieldValue::exact_int(0);
        key.get_value(1, Some(&mut out)).unwrap();
        assert_eq!(out, KeyFieldValue::exact_int(v));
    }
}

#[test]
fn byte_order_is_network_order() {
    let table = TableInfo::port_stat();
    let mut key = PortStatKey::new(&table).unwrap();
    key.set_value(1, &KeyFieldValue::exact_int(0x0102_0304)).unwrap();

    let mut buf = [0u8; 4];
    key.get_value_bytes(1, &mut buf).unwrap();
    assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);

    let mut out = KeyFieldValue::exact_buffer(4);
    key.get_value(1, Some(&mut out)).unwrap();
    assert_eq!(out.as_bytes(), Some(&[0x01, 0x02, 0x03, 0x04][..]));

    key.reset();
    key.set_value(1, &KeyFieldValue::exact_bytes(vec![0x01, 0x02, 0x03, 0x04])).unwrap();
    assert_eq!(key.get_value_u64(1).unwrap(), 0x0102_0304);
}

#[test]
fn raw_buffer_must_be_exact_width() {
    init_tracing();
    let table = TableInfo::port_cfg();
    let mut key = PortCfgKey::new(&table).unwrap();
    key.set_dev_port(DevPort::from_raw(7));

    for len in [0usize, 3, 5, 8] {
        let err = key.set_value_bytes(1, &vec![0xff; len]).unwrap_err();
        assert!(err.is_size_mismatch());
        assert_eq!(err.status(), TdiStatus::InvalidArg);
        assert_eq!(key.dev_port(), DevPort::from_raw(7));

        let mut out = vec![0xaa; len];
        let err = key.get_value_bytes(1, &mut out).unwrap_err();
        assert!(err.is_size_mismatch());
        assert!(out.iter().all(|b| *b == 0xaa));
    }
}

#[test]
fn unknown_field_is_invalid_arg() {
    let table = TableInfo::port_cfg();
    let mut key = PortCfgKey::new(&table).unwrap();
    let result = key.set_value(9, &KeyFieldValue::exact_int(1));
    assert!(matches!(result, Err(KeyError::UnknownField { field_id: 9, .. })));
    assert_eq!(result.status(), TdiStatus::InvalidArg);
    assert_eq!(key.get_value_bytes(9, &mut [0u8; 4]).status(), TdiStatus::InvalidArg);
}

#[test]
fn non_exact_field_is_rejected_without_mutation() {
    init_tracing();
    let table = TableInfo::new("$PORT")
        .with_key_field(KeyFieldInfo::new(1, "dev_port", MatchType::Ternary, 32))
        .unwrap();
    // A ternary schema cannot back a by-name layout, but sole-field keys
    // accept the table and reject every access.
    let mut key = PortCfgKey::new(&table).unwrap();
    key.set_dev_port(DevPort::from_raw(11));

    assert!(matches!(
        key.set_value(1, &KeyFieldValue::exact_int(3)),
        Err(KeyError::WrongMatchType {
            expected: MatchType::Exact,
            received: MatchType::Ternary,
            ..
        })
    ));
    assert_eq!(key.set_value_bytes(1, &[0, 0, 0, 3]).status(), TdiStatus::InvalidArg);
    assert_eq!(key.dev_port(), DevPort::from_raw(11));

    let mut out = KeyFieldValue::exact_int(0);
    assert!(key.get_value(1, Some(&mut out)).is_err());
    assert_eq!(out, KeyFieldValue::exact_int(0));

    let mut buf = [0xaa; 4];
    assert_eq!(key.get_value_bytes(1, &mut buf).status(), TdiStatus::InvalidArg);
    assert_eq!(buf, [0xaa; 4]);
}

#[test]
fn port_stat_u64_read_checks_field_kind() {
    let table = TableInfo::new("$PORT_STAT")
        .with_key_field(KeyFieldInfo::new(1, "dev_port", MatchType::Range, 32))
        .unwrap();
    let key = PortStatKey::new(&table).unwrap();
    let result = key.get_value_u64(1);
    assert!(matches!(
        result,
        Err(KeyError::WrongMatchType {
            expected: MatchType::Exact,
            received: MatchType::Range,
            ..
        })
    ));
    assert_eq!(result.status(), TdiStatus::InvalidArg);
}

#[test]
fn schema_width_must_match_key_width() {
    let table = TableInfo::from_json(
        r#"{"name": "$PORT", "key_fields": [
            {"id": 1, "name": "dev_port", "match_type": "exact", "size_bits": 16}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(PortCfgKey::new(&table), Err(KeyError::InvalidSchema { .. })));
}

#[test]
fn non_exact_value_is_rejected() {
    let table = TableInfo::port_cfg();
    let mut key = PortCfgKey::new(&table).unwrap();
    let ternary = KeyFieldValue::Ternary {
        value: FieldData::Int(1),
        mask: FieldData::Int(0xffff_ffff),
    };
    assert_eq!(key.set_value(1, &ternary).status(), TdiStatus::InvalidArg);
    assert_eq!(key.dev_port(), DevPort::from_raw(0));
}

#[test]
fn value_wider_than_field_is_rejected() {
    let table = TableInfo::port_stat();
    let mut key = PortStatKey::new(&table).unwrap();
    key.set_dev_port(DevPort::from_raw(1));
    let result = key.set_value(1, &KeyFieldValue::exact_int(u64::from(u32::MAX) + 1));
    assert!(matches!(result, Err(KeyError::ValueOutOfRange { .. })));
    assert_eq!(key.dev_port(), DevPort::from_raw(1));
}

#[test]
fn null_output_is_object_not_found() {
    let table = TableInfo::port_hdl_info();
    let key = PortHdlInfoKey::new(&table).unwrap();
    let result = key.get_value(1, None);
    assert!(matches!(result, Err(KeyError::NullOutput { field_id: 1, .. })));
    assert_eq!(result.status(), TdiStatus::ObjectNotFound);
}

#[test]
fn reset_zeroes_every_variant() {
    let cfg_table = TableInfo::port_cfg();
    let mut cfg = PortCfgKey::new(&cfg_table).unwrap();
    cfg.set_dev_port(DevPort::from_raw(300));
    cfg.reset();
    assert_eq!(cfg.dev_port(), DevPort::from_raw(0));

    let str_table = TableInfo::port_str_info();
    let mut name = PortStrInfoKey::new(&str_table).unwrap();
    name.set_port_name("1/1");
    name.reset();
    assert_eq!(name.port_name(), "");

    let hdl_table = TableInfo::port_hdl_info();
    let mut hdl = PortHdlInfoKey::new(&hdl_table).unwrap();
    hdl.set_port_hdl(PortHandle::new(4, 2));
    hdl.reset();
    assert_eq!(hdl.port_hdl(), PortHandle::default());

    let fp_table = TableInfo::port_fp_idx_info();
    let mut fp = PortFpIdxInfoKey::new(&fp_table).unwrap();
    fp.set_fp_idx(FrontPanelIndex::new(9));
    fp.reset();
    assert_eq!(fp.fp_idx(), FrontPanelIndex::new(0));
}

#[test]
fn port_hdl_fields_are_independent() {
    let table = TableInfo::port_hdl_info();
    let mut key = PortHdlInfoKey::new(&table).unwrap();

    key.set_value(1, &KeyFieldValue::exact_int(17)).unwrap();
    assert_eq!(key.port_hdl(), PortHandle::new(17, 0));

    key.set_value_bytes(2, &[0, 0, 0, 3]).unwrap();
    assert_eq!(key.port_hdl(), PortHandle::new(17, 3));

    key.set_value(1, &KeyFieldValue::exact_int(18)).unwrap();
    assert_eq!(key.port_hdl(), PortHandle::new(18, 3));

    let mut conn = KeyFieldValue::exact_int(0);
    let mut chnl = KeyFieldValue::exact_int(0);
    key.get_value(1, Some(&mut conn)).unwrap();
    key.get_value(2, Some(&mut chnl)).unwrap();
    assert_eq!((conn.as_int(), chnl.as_int()), (Some(18), Some(3)));
}

#[test]
fn port_hdl_binds_by_name_not_id() {
    let table = TableInfo::new("$PORT_HDL_INFO")
        .with_key_field(KeyFieldInfo::exact(7, "chnl_id", 32))
        .unwrap()
        .with_key_field(KeyFieldInfo::exact(3, "conn_id", 32))
        .unwrap();
    let mut key = PortHdlInfoKey::new(&table).unwrap();
    key.set_value(7, &KeyFieldValue::exact_int(1)).unwrap();
    key.set_value(3, &KeyFieldValue::exact_int(30)).unwrap();
    assert_eq!(key.port_hdl(), PortHandle::new(30, 1));
}

#[test]
fn descriptor_fast_path() {
    let table = TableInfo::port_hdl_info();
    let conn = table.key_field_by_name("conn_id").unwrap().clone();
    let chnl = table.key_field_by_name("chnl_id").unwrap().clone();
    let mut key = PortHdlInfoKey::new(&table).unwrap();

    key.set_field(&conn, 5).unwrap();
    key.set_field_bytes(&chnl, &[0, 0, 0, 1]).unwrap();
    assert_eq!(key.get_field(&conn).unwrap(), 5);
    let mut buf = [0u8; 4];
    key.get_field_bytes(&chnl, &mut buf).unwrap();
    assert_eq!(buf, [0, 0, 0, 1]);

    let ternary = KeyFieldInfo::new(1, "conn_id", MatchType::Ternary, 32);
    assert_eq!(key.set_field(&ternary, 9).status(), TdiStatus::InvalidArg);
    assert_eq!(key.get_field(&ternary).status(), TdiStatus::InvalidArg);
    let mut out = [0xaa; 4];
    assert_eq!(key.get_field_bytes(&ternary, &mut out).status(), TdiStatus::InvalidArg);
    assert_eq!(out, [0xaa; 4]);
    assert_eq!(key.port_hdl(), PortHandle::new(5, 1));

    let stranger = KeyFieldInfo::exact(4, "lane", 32);
    assert!(matches!(
        key.set_field(&stranger, 9),
        Err(KeyError::UnboundField { .. })
    ));
    assert!(key.set_field_bytes(&chnl, &[0, 1]).unwrap_err().is_size_mismatch());
}

#[test]
fn fp_idx_roundtrip() {
    let table = TableInfo::port_fp_idx_info();
    let mut key = PortFpIdxInfoKey::new(&table).unwrap();
    key.set_value_bytes(1, &[0, 0, 0x01, 0x00]).unwrap();
    assert_eq!(key.fp_idx(), FrontPanelIndex::new(256));

    let field = table.key_field(1).unwrap();
    assert_eq!(key.get_field(field).unwrap(), 256);
}

#[test]
fn port_name_is_string_only() {
    let table = TableInfo::port_str_info();
    let mut key = PortStrInfoKey::new(&table).unwrap();
    key.set_value(1, &KeyFieldValue::exact_str("12/3")).unwrap();
    assert_eq!(key.port_name(), "12/3");

    assert!(matches!(
        key.set_value(1, &KeyFieldValue::exact_int(12)),
        Err(KeyError::WrongDataKind { .. })
    ));
    assert_eq!(
        key.set_value(1, &KeyFieldValue::exact_bytes(*b"12/3")).status(),
        TdiStatus::InvalidArg
    );
    assert_eq!(key.port_name(), "12/3");

    let mut out = KeyFieldValue::exact_str("stale");
    key.get_value(1, Some(&mut out)).unwrap();
    assert_eq!(out.as_str(), Some("12/3"));

    let mut as_int = KeyFieldValue::exact_int(0);
    assert_eq!(key.get_value(1, Some(&mut as_int)).status(), TdiStatus::InvalidArg);
}

#[test]
fn keys_share_one_schema() {
    let table = TableInfo::from_json(
        r#"{"name": "$PORT_STAT", "key_fields": [
            {"id": 1, "name": "dev_port", "match_type": "exact", "size_bits": 32}
        ]}"#,
    )
    .unwrap();
    let mut a = PortStatKey::new(&table).unwrap();
    let b = PortStatKey::new(&table).unwrap();
    a.set_dev_port(DevPort::from_raw(2));
    assert_eq!(b.dev_port(), DevPort::from_raw(0));
    assert_eq!(a.table().name(), "$PORT_STAT");
}
