use anyhow::{Context, Result};

const HEADER: [&str; 16] = [
    "age",
    "job",
    "marital",
    "education",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "day_of_week",
    "duration",
    "campaign",
    "pdays",
    "previous",
    "poutcome",
    "y",
];

const JOBS: [&str; 8] = [
    "admin.",
    "blue-collar",
    "entrepreneur",
    "management",
    "retired",
    "services",
    "student",
    "technician",
];
const MARITAL: [&str; 3] = ["divorced", "married", "single"];
const EDUCATION: [&str; 4] = ["basic.9y", "high.school", "professional.course", "university.degree"];
const YES_NO_UNKNOWN: [&str; 3] = ["no", "unknown", "yes"];
const CONTACT: [&str; 2] = ["cellular", "telephone"];
const MONTHS: [&str; 10] = ["mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];
const DAYS: [&str; 5] = ["mon", "tue", "wed", "thu", "fri"];
const POUTCOME: [&str; 3] = ["failure", "nonexistent", "success"];

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

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_rows = 2000;
    let output_path = "bank_sample.csv";

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let mut accepted = 0;
    for _ in 0..n_rows {
        let age = rng.range(18, 88);
        let job = if age >= 62 { "retired" } else { rng.pick(&JOBS) };
        let contact = rng.pick(&CONTACT);
        let duration = rng.range(5, 1200);
        let poutcome = rng.pick(&POUTCOME);

        // Longer calls, cellular contact and past successes raise acceptance.
        let mut p_yes = 0.04 + duration as f64 / 4000.0;
        if contact == "cellular" {
            p_yes += 0.04;
        }
        if poutcome == "success" {
            p_yes += 0.3;
        }
        let y = if rng.next_f64() < p_yes { "yes" } else { "no" };
        if y == "yes" {
            accepted += 1;
        }

        let pdays = if poutcome == "nonexistent" { 999 } else { rng.range(0, 27) };
        let previous = if poutcome == "nonexistent" { 0 } else { rng.range(1, 6) };

        writer.write_record([
            age.to_string(),
            job.to_string(),
            rng.pick(&MARITAL).to_string(),
            rng.pick(&EDUCATION).to_string(),
            rng.pick(&YES_NO_UNKNOWN[..2]).to_string(),
            rng.pick(&YES_NO_UNKNOWN).to_string(),
            rng.pick(&YES_NO_UNKNOWN).to_string(),
            contact.to_string(),
            rng.pick(&MONTHS).to_string(),
            rng.pick(&DAYS).to_string(),
            duration.to_string(),
            rng.range(1, 10).to_string(),
            pdays.to_string(),
            previous.to_string(),
            poutcome.to_string(),
            y.to_string(),
        ])?;
    }
    writer.flush().context("flushing sample file")?;

    println!("Wrote {n_rows} rows ({accepted} accepted) to {output_path}");
    Ok(())
}
