use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (name, upper, lower, colour, main component, mean qc [MPa], mean Rf [%],
///  cohesion, gamma_sat, gamma_unsat, phi, undrained shear strength)
type SampleLayer = (
    &'static str,
    f64,
    f64,
    &'static str,
    &'static str,
    f64,
    f64,
    Option<f64>,
    f64,
    f64,
    f64,
    Option<f64>,
);

const LAYERS: [SampleLayer; 5] = [
    ("Zand, schoon, los", 0.5, 2.0, "#f5e08c", "sand", 6.0, 0.6, None, 19.0, 17.0, 30.0, None),
    ("Klei, schoon, slap", 2.0, 5.5, "#5e8f48", "clay", 0.6, 4.0, Some(0.0), 14.0, 14.0, 17.5, Some(25.0)),
    ("Veen, slap", 5.5, 7.0, "#8a5a2b", "peat", 0.3, 8.0, Some(2.0), 10.5, 10.5, 15.0, Some(10.0)),
    ("Klei, zwak zandig, matig", 7.0, 9.0, "#7fa35a", "clay", 1.2, 3.0, Some(5.0), 17.0, 17.0, 22.5, Some(50.0)),
    ("Zand, schoon, vast", 9.0, 15.0, "#e6c34a", "sand", 22.0, 0.7, None, 20.0, 18.0, 35.0, None),
];

fn main() {
    let mut rng = SimpleRng::new(42);

    // Penetration length: 0.50 → 15.00 m, step 2 cm
    let depth: Vec<f64> = (0..=725).map(|i| 0.5 + i as f64 * 0.02).collect();

    let mut qc = Vec::with_capacity(depth.len());
    let mut fs = Vec::with_capacity(depth.len());
    let mut rf = Vec::with_capacity(depth.len());
    for &d in &depth {
        let layer = LAYERS
            .iter()
            .find(|l| d >= l.1 && d < l.2)
            .unwrap_or(&LAYERS[LAYERS.len() - 1]);
        let q = rng.gauss(layer.5, layer.5 * 0.12).max(0.05);
        let r = rng.gauss(layer.6, layer.6 * 0.1).max(0.1);
        qc.push(q);
        rf.push(r);
        fs.push(q * r / 100.0);
    }
    let depth_offset: Vec<f64> = depth.iter().map(|d| 0.8 - d).collect();

    let parse = json!({
        "label": "CPT-SAMPLE-01",
        "location": {"srs": "EPSG:4326", "lat": 52.0116, "long": 4.3592},
        "verticalPositionReferencePoint": "NAP",
        "verticalPositionOffset": 0.8,
        "predrilledDepth": 0.5,
        "groundwaterLevel": 1.1,
        "data": {
            "penetrationLength": depth,
            "depthOffset": depth_offset,
            "coneResistance": qc,
            "localFriction": fs,
            "frictionRatio": rf,
        }
    });

    let classify = json!({
        "geotechnicalSoilName": LAYERS.iter().map(|l| l.0).collect::<Vec<_>>(),
        "upperBoundary": LAYERS.iter().map(|l| l.1).collect::<Vec<_>>(),
        "lowerBoundary": LAYERS.iter().map(|l| l.2).collect::<Vec<_>>(),
        "color": LAYERS.iter().map(|l| l.3).collect::<Vec<_>>(),
        "mainComponent": LAYERS.iter().map(|l| l.4).collect::<Vec<_>>(),
        "cohesion": LAYERS.iter().map(|l| l.7).collect::<Vec<_>>(),
        "gamma_sat": LAYERS.iter().map(|l| l.8).collect::<Vec<_>>(),
        "gamma_unsat": LAYERS.iter().map(|l| l.9).collect::<Vec<_>>(),
        "phi": LAYERS.iter().map(|l| l.10).collect::<Vec<_>>(),
        "undrainedShearStrength": LAYERS.iter().map(|l| l.11).collect::<Vec<_>>(),
    });

    for (path, body) in [
        ("response_parse.json", &parse),
        ("response_classify.json", &classify),
    ] {
        let text = serde_json::to_string_pretty(body).expect("Failed to serialize response");
        std::fs::write(path, text).expect("Failed to write output file");
        println!("Wrote {path}");
    }
    println!(
        "{} CPT samples, {} layers",
        depth.len(),
        LAYERS.len()
    );
}
