//! End-to-end pattern instantiation and annotation against the in-memory host

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use patterns::{
    HostContext, InMemoryModel, InMemoryPatternService, ParamValue, StereotypeProperties,
    NAME_PARAM,
};
use shared::{LogixError, NullLogger, PatternConfig, ScanMode};

fn workspace(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in files {
        std::fs::write(dir.path().join(name), "<umlt/>").unwrap();
    }
    dir
}

fn host() -> (InMemoryModel, InMemoryPatternService) {
    let model = InMemoryModel::new();
    model.add_package("UML Types").unwrap();
    model.add_package("LineControl").unwrap();
    let service = InMemoryPatternService::new(model.clone());
    (model, service)
}

fn run(dir: &Path, model: &mut InMemoryModel, service: &mut InMemoryPatternService) -> patterns::PatternRunReport {
    let mut ctx = HostContext::new(dir, service, model);
    patterns::run(&mut ctx, &PatternConfig::default(), Arc::new(NullLogger)).unwrap()
}

#[test]
fn test_marked_and_plain_patterns() {
    let dir = workspace(&["Conveyor_.umlt", "Estop.umlt"]);
    let (mut model, mut service) = host();

    let report = run(dir.path(), &mut model, &mut service);

    // Three variants for the marked pattern, one for the plain one.
    let conveyor: Vec<_> = service
        .applied()
        .iter()
        .filter(|a| a.pattern_name == "Conveyor_")
        .collect();
    assert_eq!(conveyor.len(), 3);

    let generated: BTreeSet<&str> = conveyor
        .iter()
        .map(|a| match a.params.get(NAME_PARAM) {
            Some(ParamValue::Text(name)) => name.as_str(),
            other => panic!("expected a generated name, got {:?}", other),
        })
        .collect();
    assert_eq!(
        generated,
        BTreeSet::from(["Conveyor_dual", "Conveyor_sequential", "Conveyor_single"])
    );

    let package = conveyor[0].params.get("Conveyor_").unwrap();
    assert!(conveyor.iter().all(|a| a.params.get("Conveyor_") == Some(package)));

    let estop: Vec<_> = service
        .applied()
        .iter()
        .filter(|a| a.pattern_name == "Estop")
        .collect();
    assert_eq!(estop.len(), 1);
    assert!(estop[0].params.get(NAME_PARAM).is_none());

    let modes: Vec<(&str, ScanMode)> = report
        .annotations
        .iter()
        .map(|a| (a.name.as_str(), a.scan_mode))
        .collect();
    assert_eq!(
        modes,
        vec![
            ("Conveyor_single", ScanMode::Single),
            ("Conveyor_dual", ScanMode::Dual),
            ("Conveyor_sequential", ScanMode::Sequential),
            ("Estop", ScanMode::Single),
        ]
    );
}

#[test]
fn test_rerun_is_stable_for_existing_machines() {
    let dir = workspace(&["Pump_.umlt"]);
    let (mut model, mut service) = host();

    run(dir.path(), &mut model, &mut service);
    let report = run(dir.path(), &mut model, &mut service);

    // The in-memory service creates fresh machines on every application,
    // so the second run sees both generations and annotates all of them.
    assert_eq!(report.annotations.len(), 6);
    assert_eq!(service.registrations().len(), 2);

    let scope = patterns::StereotypeScope::new("LogixUML", "StateMachineAoi");
    for machine in patterns::ModelRepository::state_machines(&model).unwrap() {
        assert_eq!(model.stereotypes_of(&machine.id).unwrap().len(), 1);
        let props = StereotypeProperties::new(&model, &machine.id, &scope);
        assert_eq!(props.event_queue_size().unwrap(), 2);
        assert_eq!(props.transition_scan_mode().unwrap(), ScanMode::from_name(&machine.name));
    }
}

#[test]
fn test_pre_existing_machines_are_annotated_by_name() {
    let dir = workspace(&[]);
    let (mut model, mut service) = host();
    let pkg = patterns::ModelRepository::packages(&model)
        .unwrap()
        .into_iter()
        .find(|p| p.name == "LineControl")
        .unwrap();
    model.add_state_machine(&pkg.id, "Mixer_dual").unwrap();

    let report = run(dir.path(), &mut model, &mut service);
    assert!(report.instantiation.applications.is_empty());
    assert_eq!(report.annotations.len(), 1);
    assert_eq!(report.annotations[0].scan_mode, ScanMode::Dual);
}

#[test]
fn test_two_user_packages_is_fatal() {
    let dir = workspace(&["Pump_.umlt"]);
    let (mut model, mut service) = host();
    model.add_package("Scratch").unwrap();

    let mut ctx = HostContext::new(dir.path(), &mut service, &mut model);
    let err = patterns::run(&mut ctx, &PatternConfig::default(), Arc::new(NullLogger)).unwrap_err();
    assert!(matches!(err, LogixError::TargetPackage(_)));
}

#[test]
fn test_custom_marker_round_trips_through_annotation() {
    let dir = workspace(&["Motor~.umlt", "Motor_.umlt"]);
    let (mut model, mut service) = host();
    let config = PatternConfig {
        multiplicity_marker: '~',
        ..PatternConfig::default()
    };

    let report = {
        let mut ctx = HostContext::new(dir.path(), &mut service, &mut model);
        patterns::run(&mut ctx, &config, Arc::new(NullLogger)).unwrap()
    };

    let modes: Vec<(&str, ScanMode)> = report
        .annotations
        .iter()
        .map(|a| (a.name.as_str(), a.scan_mode))
        .collect();
    assert_eq!(
        modes,
        vec![
            ("Motor_", ScanMode::Single),
            ("Motor~single", ScanMode::Single),
            ("Motor~dual", ScanMode::Dual),
            ("Motor~sequential", ScanMode::Sequential),
        ]
    );
}
