use std::path::Path;

#[test]
fn scenarios_load_and_run() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios");
    let scenarios = ["office.yaml", "conference_room.yaml"];

    for name in scenarios {
        let path = root.join(name);
        let scenario = hv_sim::Scenario::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        let record = scenario
            .run()
            .unwrap_or_else(|e| panic!("Failed to run {}: {}", name, e));

        assert_eq!(record.len(), scenario.sim.cycles);
        for c in record.iter() {
            assert!(c.terms.output >= scenario.controller.out_min);
            assert!(c.terms.output <= scenario.controller.out_max);
        }
    }
}

#[test]
fn office_file_matches_builtin() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios/office.yaml");
    let scenario = hv_sim::Scenario::load_yaml(&path).unwrap();
    assert_eq!(scenario, hv_sim::Scenario::office());
}
