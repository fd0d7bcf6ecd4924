//! Loading descriptions with several gate tables of mixed width.

use gatescan_bind::Binder;
use gatescan_circuit::{load, CircuitDescription, LoadError, LoadOptions};
use gatescan_core::{ElementType, PinId};
use gatescan_test_utils::fixtures::{circuit_json, vga_circuit_json, TableData, VGA_PINS};
use gatescan_test_utils::{MockEngine, Settled};

fn engine() -> MockEngine {
    MockEngine::builder()
        .array("state", ElementType::U8, 16)
        .array("gate_n", ElementType::U32, 1)
        .array("luts", ElementType::U64, 2)
        .array("dffs", ElementType::U32, 3)
        .absent("latches", ElementType::U32)
        .script(Settled)
        .build()
}

#[test]
fn every_table_lands_in_its_engine_array() {
    let text = vga_circuit_json(&[
        ("luts", TableData::Uint64(vec![0xdead_beef, 1 << 40])),
        ("dffs", TableData::Uint32(vec![4, 5, 6])),
        ("latches", TableData::Uint32(vec![])),
    ]);
    let desc = CircuitDescription::from_reader(text.as_bytes()).unwrap();
    let mut binder = Binder::bind(engine()).unwrap();

    let report = load(&mut binder, &desc, &LoadOptions::default()).unwrap();

    let names: Vec<&str> = report.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["luts", "dffs"]);
    assert_eq!(report.gate_count, 2);
    let e = binder.engine();
    assert_eq!(e.array::<u64>("luts"), &[0xdead_beef, 1 << 40]);
    assert_eq!(e.array::<u32>("dffs"), &[4, 5, 6]);
    assert_eq!(e.array::<u32>("gate_n"), &[2]);
}

#[test]
fn primary_table_is_configurable() {
    let text = vga_circuit_json(&[
        ("luts", TableData::Uint64(vec![1, 2])),
        ("dffs", TableData::Uint32(vec![4, 5, 6])),
    ]);
    let desc = CircuitDescription::from_json(&text).unwrap();
    let mut binder = Binder::bind(engine()).unwrap();
    let options = LoadOptions {
        primary_table: "dffs".into(),
        ..LoadOptions::default()
    };

    let report = load(&mut binder, &desc, &options).unwrap();

    assert_eq!(report.gate_count, 3);
    assert_eq!(binder.engine().array::<u32>("gate_n"), &[3]);
}

#[test]
fn load_survives_memory_growth_between_calls() {
    let text = vga_circuit_json(&[("luts", TableData::Uint64(vec![7, 8]))]);
    let desc = CircuitDescription::from_json(&text).unwrap();
    let mut binder = Binder::bind(engine()).unwrap();
    binder.read_by_name::<u64>("luts").unwrap();
    binder.engine_mut().relocate(512);

    load(&mut binder, &desc, &LoadOptions::default()).unwrap();

    assert_eq!(binder.engine().array::<u64>("luts"), &[7, 8]);
}

#[test]
fn description_without_gate_n_in_engine_fails() {
    let engine = MockEngine::builder()
        .array("state", ElementType::U8, 16)
        .array("luts", ElementType::U64, 1)
        .build();
    let mut binder = Binder::bind(engine).unwrap();
    let desc =
        CircuitDescription::from_json(&circuit_json(&VGA_PINS, &[("luts", TableData::Uint64(vec![1]))]))
            .unwrap();
    assert_eq!(
        load(&mut binder, &desc, &LoadOptions::default()).unwrap_err(),
        LoadError::MissingTable {
            table: "gate_n".into()
        }
    );
}

#[test]
fn size_mismatch_in_a_later_table_writes_nothing() {
    let text = vga_circuit_json(&[
        ("luts", TableData::Uint64(vec![7, 8])),
        ("dffs", TableData::Uint32(vec![1, 2])),
    ]);
    let desc = CircuitDescription::from_json(&text).unwrap();
    let mut binder = Binder::bind(engine()).unwrap();
    binder.engine_mut().set_state(PinId(3), 1);

    assert_eq!(
        load(&mut binder, &desc, &LoadOptions::default()).unwrap_err(),
        LoadError::SizeMismatch {
            table: "dffs".into(),
            engine_len: 3,
            payload_len: 2,
        }
    );

    let e = binder.engine();
    assert_eq!(e.array::<u32>("gate_n"), &[0]);
    assert_eq!(e.array::<u64>("luts"), &[0, 0]);
    assert_eq!(e.state()[3], 1);
    assert_eq!(e.counters().update_all, 0);
}

#[test]
fn engine_without_state_array_fails_before_writing() {
    let engine = MockEngine::builder()
        .array("gate_n", ElementType::U32, 1)
        .array("luts", ElementType::U64, 1)
        .build();
    let mut binder = Binder::bind(engine).unwrap();
    let desc =
        CircuitDescription::from_json(&circuit_json(&VGA_PINS, &[("luts", TableData::Uint64(vec![1]))]))
            .unwrap();
    assert_eq!(
        load(&mut binder, &desc, &LoadOptions::default()).unwrap_err(),
        LoadError::MissingTable {
            table: "state".into()
        }
    );
    assert_eq!(binder.engine().array::<u64>("luts"), &[0]);
    assert_eq!(binder.engine().array::<u32>("gate_n"), &[0]);
}
