//! Full runs over the synthetic market year driven by scenario config.

use bess_sim::config::ScenarioConfig;
use bess_sim::io::export::write_traces;
use bess_sim::report::RevenueReport;
use bess_sim::sim::DispatchSimulator;

fn two_week_scenario(seed: u64) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.synthetic.hours = 24 * 14;
    cfg.synthetic.seed = seed;
    cfg
}

#[test]
fn synthetic_run_holds_core_invariants() {
    let cfg = two_week_scenario(42);
    let dataset = cfg.build_dataset().expect("synthetic build succeeds");
    let mut sim = DispatchSimulator::new(
        cfg.site.name.as_str(),
        cfg.battery.capacity_mwh,
        cfg.dispatch.discharge_price,
        &dataset,
    )
    .expect("valid capacity");
    sim.run().expect("all timestamps present");

    assert_eq!(sim.revenue_trace().len(), dataset.len());
    assert_eq!(sim.soc_trace().len(), dataset.len());
    for (r, s) in sim.revenue_trace().iter().zip(sim.soc_trace()) {
        assert_eq!(r.timestamp, s.timestamp);
        assert!(r.value >= 0.0, "revenue must be non-negative");
        assert!(s.value >= 0.0 && s.value <= cfg.battery.capacity_mwh);
    }
}

#[test]
fn synthetic_run_is_deterministic_per_seed() {
    let cfg = two_week_scenario(7);
    let dataset_a = cfg.build_dataset().expect("first build");
    let dataset_b = cfg.build_dataset().expect("second build");

    let mut sim_a =
        DispatchSimulator::new("site", 10.0, 20.0, &dataset_a).expect("valid capacity");
    sim_a.run().expect("run a");
    let mut sim_b =
        DispatchSimulator::new("site", 10.0, 20.0, &dataset_b).expect("valid capacity");
    sim_b.run().expect("run b");

    let mut out_a = Vec::new();
    write_traces(sim_a.revenue_trace(), sim_a.soc_trace(), &mut out_a).expect("export a");
    let mut out_b = Vec::new();
    write_traces(sim_b.revenue_trace(), sim_b.soc_trace(), &mut out_b).expect("export b");
    assert_eq!(out_a, out_b);
}

#[test]
fn monthly_report_total_matches_trace_sum() {
    let cfg = two_week_scenario(99);
    let dataset = cfg.build_dataset().expect("synthetic build succeeds");
    let mut sim = DispatchSimulator::new("site", 10.0, 20.0, &dataset).expect("valid capacity");
    sim.run().expect("all timestamps present");

    let report = RevenueReport::from_trace(sim.revenue_trace());
    let monthly_sum: f64 = report.monthly.iter().map(|m| m.revenue).sum();
    assert!((report.total - sim.total_revenue()).abs() < 1e-9);
    assert!((monthly_sum - report.total).abs() < 1e-9);
}

#[test]
fn higher_threshold_never_earns_more() {
    // A stricter price floor can only block discharge hours; with the
    // same input series it cannot increase realized revenue.
    let cfg = two_week_scenario(5);
    let dataset = cfg.build_dataset().expect("synthetic build succeeds");

    let mut loose = DispatchSimulator::new("site", 10.0, 15.0, &dataset).expect("valid capacity");
    loose.run().expect("loose run");
    let mut strict = DispatchSimulator::new("site", 10.0, 60.0, &dataset).expect("valid capacity");
    strict.run().expect("strict run");

    // Not a general theorem (held-back energy could sell higher later),
    // but at a fixed unit rate over this series the strict floor trades
    // strictly fewer hours; assert the weaker directional check.
    assert!(strict.revenue_trace().iter().filter(|p| p.value > 0.0).count()
        <= loose.revenue_trace().iter().filter(|p| p.value > 0.0).count());
}
