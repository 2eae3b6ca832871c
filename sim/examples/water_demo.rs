//! Basic demonstration of the soil water simulation.
//!
//! Run with: cargo run --example water_demo

use soilwater_sim::{Edge, HexAddress, HexDirection, SoilType, WaterSim};

fn main() {
    println!("=== Soil Water - Simulation Demo ===\n");

    let mut sim = WaterSim::new();

    // A two-layer garden bed: loam on top of clay, with a sand strip on the east.
    for q in -2..=2 {
        for r in -1..=1 {
            let top_soil = if q == 2 { SoilType::Sand } else { SoilType::Loam };
            sim.add_hex(HexAddress::new(q, r, 1), top_soil);
            sim.add_hex(HexAddress::new(q, r, 0), SoilType::Clay);
        }
    }

    // Line the bottom of the clay layer so the bed does not drain into the ground.
    for q in -2..=2 {
        for r in -1..=1 {
            sim.add_barrier(HexAddress::new(q, r, 0), Edge::DOWN_INDEX);
        }
    }

    // A wall between the western loam and its neighbor.
    let west = HexAddress::new(-2, 0, 1);
    sim.add_edge_barrier(west, west.neighbor(HexDirection::East));

    println!("Watering the middle of the bed...\n");
    sim.add_water(HexAddress::new(0, 0, 1), 400.0);
    sim.add_water(HexAddress::new(1, 0, 1), 250.0);
    print_column(&sim, 0, 0);

    // 30 seconds at 10 ticks per second.
    for step in 0..300 {
        sim.tick(0.1);

        if (step + 1) % 50 == 0 {
            let budget = sim.last_budget();
            println!(
                "--- Tick {} (t={:.1}s) total={:.1} evaporated={:.3} drained={:.3} seeped={:.3} ---",
                sim.current_tick(),
                sim.current_time(),
                sim.total_water(),
                budget.evaporated,
                budget.drained_down,
                budget.seeped_lateral
            );
            print_column(&sim, 0, 0);
        }
    }

    println!("\n--- Heat wave: 40 C ---\n");
    sim.set_temperature(40.0);
    for _ in 0..100 {
        sim.tick(0.1);
    }
    print_column(&sim, 0, 0);

    let total = sim.total_budget();
    println!(
        "\nLifetime losses: evaporated={:.1} drained={:.1} seeped={:.1} (moved {:.1} between cells)",
        total.evaporated,
        total.drained_down,
        total.seeped_lateral,
        total.moved
    );

    println!("\n=== Final State (JSON) ===\n");
    match sim.snapshot().to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("snapshot failed: {}", err),
    }
}

fn print_column(sim: &WaterSim, q: i32, r: i32) {
    for y in (0..=1).rev() {
        let addr = HexAddress::new(q, r, y);
        println!(
            "  {}: {:.1} ml (saturation {:.2})",
            addr,
            sim.get_water_ml(addr),
            sim.get_saturation(addr)
        );
    }
}
