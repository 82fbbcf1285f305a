use serde::Serialize;

/// One line of the generated file, headed like the Zomato export.
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "Restaurant ID")]
    id: u32,
    #[serde(rename = "Restaurant Name")]
    name: String,
    #[serde(rename = "City")]
    city: &'static str,
    #[serde(rename = "Cuisines")]
    cuisines: String,
    #[serde(rename = "Average Cost for two")]
    average_cost_for_two: u32,
    #[serde(rename = "Has Online delivery")]
    has_online_delivery: &'static str,
    #[serde(rename = "Aggregate rating")]
    aggregate_rating: String,
    #[serde(rename = "Votes")]
    votes: u32,
}

/// splitmix64, deterministic across runs.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

const CITIES: [(&str, u32); 4] = [
    ("Bangalore", 1800),
    ("Delhi", 2500),
    ("Mumbai", 3000),
    ("Pune", 1500),
];

const CUISINES: [&str; 12] = [
    "North Indian",
    "South Indian",
    "Chinese",
    "Italian",
    "Continental",
    "Fast Food",
    "Mughlai",
    "Cafe",
    "Desserts",
    "Street Food",
    "Thai",
    "Seafood",
];

const NAME_PARTS: [&str; 8] = [
    "Spice", "Dragon", "Curry", "Olive", "Saffron", "Tandoor", "Lotus", "Urban",
];
const NAME_SUFFIXES: [&str; 6] = ["House", "Kitchen", "Bowl", "Cafe", "Bistro", "Point"];

fn main() -> anyhow::Result<()> {
    let mut rng = SplitMix(42);
    let output_path = "sample_restaurants.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    let mut rows = 0u32;

    for &(city, max_cost) in &CITIES {
        for _ in 0..150 {
            let n_cuisines = 1 + rng.below(3) as usize;
            let mut cuisines: Vec<&str> = Vec::with_capacity(n_cuisines);
            while cuisines.len() < n_cuisines {
                let c = *rng.pick(&CUISINES);
                if !cuisines.contains(&c) {
                    cuisines.push(c);
                }
            }

            let cost = 50 * (2 + rng.below(u64::from(max_cost / 50 - 1)) as u32);
            // Pricier places rate slightly better, with noise.
            let base = 2.5 + 1.5 * f64::from(cost) / f64::from(max_cost);
            let noise = (rng.below(21) as f64 - 10.0) / 10.0;
            let rating = (base + noise).clamp(0.0, 4.9);
            // Unrated restaurants carry a zero rating and no votes.
            let (rating, votes) = if rng.below(12) == 0 {
                (0.0, 0)
            } else {
                (rating, (rating * rating * 40.0) as u32 + rng.below(200) as u32)
            };

            // A few rows lack cuisines, like the original export.
            let cuisines = if rng.below(40) == 0 {
                String::new()
            } else {
                cuisines.join(", ")
            };

            writer.serialize(SampleRow {
                id: 1000 + rows,
                name: format!("{} {}", rng.pick(&NAME_PARTS), rng.pick(&NAME_SUFFIXES)),
                city,
                cuisines,
                average_cost_for_two: cost,
                has_online_delivery: if rng.below(2) == 0 { "Yes" } else { "No" },
                aggregate_rating: format!("{rating:.1}"),
                votes,
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    println!("Wrote {rows} restaurants to {output_path}");
    Ok(())
}
