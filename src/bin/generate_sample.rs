use std::error::Error;

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

    fn pick<'a, T>(&mut self, options: &'a [T]) -> &'a T {
        &options[(self.next_u64() % options.len() as u64) as usize]
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

const CATEGORIES: &[(&str, f64, f64)] = &[
    // (name, price floor, price ceiling)
    ("Mobile & Tablet", 120.0, 900.0),
    ("Laptop", 400.0, 2200.0),
    ("Audio", 25.0, 300.0),
    ("Accessories", 5.0, 80.0),
    ("Home Appliance", 60.0, 700.0),
];

const PAYMENT_METHODS: &[&str] = &["JazzWallet", "Card", "Bank Transfer", "COD"];

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Write a deterministic synthetic 2022 sales export to
/// `sample_sales.csv`: every month populated, several categories and
/// payment providers, and a sprinkling of invalid transactions so the
/// validity filter has something to do.
fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path("sample_sales.csv")?;

    writer.write_record([
        "order_date",
        "id",
        "customer_id",
        "sku_id",
        "sku_name",
        "category",
        "payment_method",
        "price",
        "qty_ordered",
        "before_discount",
        "discount_amount",
        "after_discount",
        "cogs",
        "is_valid",
        "registered_date",
    ])?;

    let mut order_id = 1000u64;
    for (month_idx, &days) in DAYS_IN_MONTH.iter().enumerate() {
        let month = month_idx as u32 + 1;
        // Seasonal volume: slow start, busy year end.
        let orders_this_month = 40 + month * 4;

        for _ in 0..orders_this_month {
            order_id += 1;
            let day = (rng.next_u64() % days as u64) as u32 + 1;
            let customer = format!("C{:04}", rng.next_u64() % 400);

            let &(category, lo, hi) = rng.pick(CATEGORIES);
            let sku_no = rng.next_u64() % 12;
            let sku_id = format!("{}-{sku_no:02}", category_code(category));
            let sku_name = format!("{category} Item {sku_no}");

            let price = rng.range(lo, hi).round();
            let qty = (rng.next_u64() % 3 + 1) as f64;
            let before_discount = price * qty;
            let discount = if rng.next_f64() < 0.3 {
                (before_discount * rng.range(0.05, 0.25)).round()
            } else {
                0.0
            };
            let cogs = (price * rng.range(0.55, 0.8)).round();
            let is_valid = if rng.next_f64() < 0.08 { 0 } else { 1 };

            writer.write_record([
                format!("2022-{month:02}-{day:02}"),
                order_id.to_string(),
                customer,
                sku_id,
                sku_name,
                category.to_string(),
                rng.pick(PAYMENT_METHODS).to_string(),
                format!("{price:.0}"),
                format!("{qty:.0}"),
                format!("{before_discount:.0}"),
                format!("{discount:.0}"),
                format!("{:.0}", before_discount - discount),
                format!("{cogs:.0}"),
                is_valid.to_string(),
                format!("2021-{:02}-{:02}", rng.next_u64() % 12 + 1, rng.next_u64() % 28 + 1),
            ])?;
        }
    }

    writer.flush()?;
    println!("Wrote sample_sales.csv ({} orders)", order_id - 1000);
    Ok(())
}

fn category_code(category: &str) -> &'static str {
    match category {
        "Mobile & Tablet" => "MOB",
        "Laptop" => "LAP",
        "Audio" => "AUD",
        "Accessories" => "ACC",
        _ => "HOM",
    }
}
