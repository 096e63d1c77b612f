// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Spring and wall demo
//!
//! A mass hangs from a wall on a spring and is launched downwards. The
//! closed-form solution and the numeric solver are stepped side by side
//! at the default refresh period, printing the mass position each frame.
//!
//! Run with: `cargo run --example spring_wall`

use ftlog::LevelFilter;
use kinematic_engine::description::{
    AssemblyDescription, BodyDescription, BodyKind, ConnectorDescription, TimelineDescription,
};
use kinematic_engine::model::{Assembly, AttributeSchema};
use kinematic_engine::solver::{mechanical_energy, IntegratorKind, SpringOscillation};
use kinematic_engine::timeline::EvolutionFunction;
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

const FRAMES: usize = 50;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // no root appender: logs go to stderr
    let _guard = ftlog::Builder::new()
        .max_log_level(LevelFilter::Info)
        .try_init()?;

    let description = AssemblyDescription::new("single circle")
        .with_body(
            BodyDescription::new("circ", BodyKind::MassPoint)
                .parameter("x", 20.0)
                .parameter("y", 0.0)
                .parameter("vy", -30.0)
                .parameter("mass", 10.0)
                .parameter("radius", 5.0),
        )
        .with_body(
            BodyDescription::new("wall", BodyKind::StaticModel)
                .parameter("x", 20.0)
                .parameter("y", 100.0)
                .parameter("theta", -FRAC_PI_2)
                .parameter("width", 30.0),
        )
        .with_connector(
            ConnectorDescription::spring("spring", "wall", "circ")
                .parameter("stiffness", 30.0)
                .parameter("natural_length", 100.0),
        );

    let assembly = Assembly::from_description(&description, AttributeSchema::standalone())?;
    let initial = assembly.initial_snapshot()?;

    let closed_form: Arc<dyn EvolutionFunction> =
        Arc::new(SpringOscillation::new("circ", "spring"));
    let mut exact = TimelineDescription::fixed().build(
        initial.clone(),
        &description.fields,
        Some(closed_form),
    )?;
    let mut numeric = TimelineDescription::numeric(IntegratorKind::VelocityVerlet, 1e-3).build(
        initial.clone(),
        &description.fields,
        None,
    )?;

    println!("{:>6}  {:>12}  {:>12}  {:>12}", "t", "y exact", "y numeric", "energy");
    for _ in 0..FRAMES {
        let a = exact.tick()?;
        let b = numeric.tick()?;
        println!(
            "{:>6.2}  {:>12.6}  {:>12.6}  {:>12.4}",
            exact.current_timestamp(),
            a.get_dynamic("circ")?.y(),
            b.get_dynamic("circ")?.y(),
            mechanical_energy(&b)?,
        );
    }

    Ok(())
}
