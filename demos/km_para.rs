use clap::Parser;
use kmeans_para::*;
use rand::RngCore;

/// Cluster randomly generated samples and print the resulting partitions.
#[derive(Parser, Debug)]
struct Args {
    /// Amount of samples to generate
    npoints: usize,
    /// Amount of dimensions per sample
    dimension: usize,
    /// Amount of clusters
    ncentroids: usize,
    /// Distance below which a sample counts as close enough to its centroid
    mindistance: f32,
    /// Seed for sample generation and centroid seeding (negative values wrap around)
    #[arg(allow_negative_numbers = true)]
    seed: i32,
    /// Amount of worker threads
    threads: usize,
    /// Maximum amount of rounds
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Samples and seeding share one generator, samples are drawn first
    let mut rnd = MwcRng::new(args.seed as u32);
    let value_cnt = args.npoints.checked_mul(args.dimension).ok_or_else(|| KMeansError::InvalidData(
        format!("{} samples x {} dimensions does not fit into memory", args.npoints, args.dimension)))?;
    let mut samples = vec![0.0f32;value_cnt];
    samples.iter_mut().for_each(|v| *v = (rnd.next_u32() & 0xffff) as f32);

    let conf = KMeansConfig::build()
        .random_generator(rnd)
        .thread_cnt(args.threads)
        .max_rounds(args.max_rounds)
        .build();

    let kmean = KMeans::new(samples, args.npoints, args.dimension)?;
    let result = kmean.kmeans_para(args.ncentroids, args.mindistance, &conf)?;

    for (i, partition) in result.partitions().iter().enumerate() {
        println!("\nPartition {}:", i);
        let ids: Vec<String> = partition.iter().map(|id| id.to_string()).collect();
        println!("{}", ids.join(" "));
    }
    if !result.converged() {
        eprintln!("Stopped after {} rounds without converging", result.rounds);
    }
    Ok(())
}
