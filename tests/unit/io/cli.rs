//! Tests for command-line parsing and run processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use chunkwalk::io::cli::{Cli, RunProcessor, run_output_path, run_seeds, visualization_path};
    use chunkwalk::io::configuration::{
        DEFAULT_CHUNK_COUNT, DEFAULT_CHUNK_DIMENSION, DEFAULT_OUTPUT, DEFAULT_RUNS,
        DEFAULT_SECONDARY_PATH_CHANCE,
    };
    use chunkwalk::math::random::derive_seed;
    use std::path::{Path, PathBuf};

    // Tests CLI parsing with no arguments
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program"]);

        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cli.seed, None);
        assert_eq!(cli.chunks, DEFAULT_CHUNK_COUNT);
        assert_eq!((cli.width, cli.height), (DEFAULT_CHUNK_DIMENSION, DEFAULT_CHUNK_DIMENSION));
        assert!((cli.secondary_chance - DEFAULT_SECONDARY_PATH_CHANCE).abs() < f64::EPSILON);
        assert_eq!(cli.runs, DEFAULT_RUNS);
        assert!(!cli.visualize && !cli.stats && !cli.verify && !cli.quiet);
    }

    // Tests CLI parsing with all available arguments
    // Verified by renaming long flags
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "--output",
            "out/map.png",
            "--seed",
            "forest",
            "--chunks",
            "12",
            "--width",
            "9",
            "--height",
            "7",
            "--expansion",
            "0.25",
            "--irregularity",
            "0.75",
            "--secondary-chance",
            "40",
            "--runs",
            "3",
            "--visualize",
            "--stats",
            "--verify",
            "--quiet",
        ]);

        assert_eq!(cli.output, PathBuf::from("out/map.png"));
        assert_eq!(cli.seed.as_deref(), Some("forest"));
        assert_eq!(cli.chunks, 12);
        assert_eq!((cli.width, cli.height), (9, 7));
        assert!((cli.expansion - 0.25).abs() < f64::EPSILON);
        assert!((cli.irregularity - 0.75).abs() < f64::EPSILON);
        assert!((cli.secondary_chance - 40.0).abs() < f64::EPSILON);
        assert_eq!(cli.runs, 3);
        assert!(cli.visualize && cli.stats && cli.verify && cli.quiet);
    }

    // Tests short flag parsing
    // Verified by changing short flag definitions
    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "program", "-o", "a.png", "-s", "7", "-c", "5", "-W", "4", "-H", "6", "-e", "0.1",
            "-i", "0.9", "-b", "100", "-n", "2", "-v", "-q",
        ]);

        assert_eq!(cli.output, PathBuf::from("a.png"));
        assert_eq!(cli.seed.as_deref(), Some("7"));
        assert_eq!(cli.chunks, 5);
        assert_eq!((cli.width, cli.height), (4, 6));
        assert_eq!(cli.runs, 2);
        assert!(cli.visualize && cli.quiet);
    }

    // Tests progress display needs several runs and no --quiet
    // Verified by inverting quiet flag logic
    #[test]
    fn test_should_show_progress() {
        assert!(!Cli::parse_from(["program"]).should_show_progress());
        assert!(Cli::parse_from(["program", "-n", "3"]).should_show_progress());
        assert!(!Cli::parse_from(["program", "-n", "3", "-q"]).should_show_progress());
    }

    // Tests the arguments map onto a layout configuration
    // Verified by swapping width and height in layout_config
    #[test]
    fn test_layout_config() {
        let cli = Cli::parse_from(["program", "-W", "9", "-H", "5", "-c", "6", "-b", "0"]);
        let config = cli.layout_config("abc".to_string());

        assert_eq!(config.chunk_dimensions.width, 9);
        assert_eq!(config.chunk_dimensions.height, 5);
        assert_eq!(config.chunk_count, 6);
        assert_eq!(config.seed, "abc");
        assert!(config.secondary_path_chance.abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    // Tests consecutive descending seeds for several runs
    // Verified by counting seeds upward
    #[test]
    fn test_run_seeds() {
        let seeds = |seed: &str, runs: usize| run_seeds(seed, runs).expect("run count fits");
        assert_eq!(seeds("forest", 1), vec!["forest".to_string()]);
        assert_eq!(seeds("10", 3), vec!["10", "9", "8"]);

        let base = derive_seed("forest");
        assert_eq!(
            seeds("forest", 2),
            vec![base.to_string(), base.wrapping_sub(1).to_string()]
        );
        assert_eq!(
            seeds(&i32::MIN.to_string(), 2),
            vec![i32::MIN.to_string(), i32::MAX.to_string()]
        );
    }

    // Tests run counts beyond the seed range are rejected
    // Verified by truncating the run index to i32
    #[test]
    fn test_run_seeds_rejects_oversized_counts() {
        let too_many = usize::try_from(i32::MAX).expect("usize holds i32::MAX") + 1;

        let error = run_seeds("10", too_many).expect_err("run count exceeds i32::MAX");
        assert!(error.is_configuration_error());
    }

    // Tests per-run and visualization output names
    // Verified by dropping the run index from the file name
    #[test]
    fn test_output_paths() {
        let output = Path::new("renders/layout.png");

        assert_eq!(run_output_path(output, 0, 1), PathBuf::from("renders/layout.png"));
        assert_eq!(run_output_path(output, 2, 3), PathBuf::from("renders/layout_2.png"));
        assert_eq!(
            visualization_path(&run_output_path(output, 1, 2)),
            PathBuf::from("renders/layout_1_generation.gif")
        );
    }

    // Tests a single run writes the PNG and the requested GIF
    // Verified by skipping the visualization export
    #[test]
    fn test_process_single_run() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("map.png");
        let output_arg = output.to_string_lossy().to_string();
        let cli = Cli::parse_from([
            "program", "-o", output_arg.as_str(), "-s", "42", "-c", "3", "-W", "5", "-H", "5", "-v",
            "--verify", "-q",
        ]);

        RunProcessor::new(cli).process().expect("run should succeed");

        assert!(output.exists());
        assert!(dir.path().join("map_generation.gif").exists());
    }

    // Tests several runs write one PNG each
    // Verified by writing every run to the same file
    #[test]
    fn test_process_multiple_runs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output_arg = dir.path().join("map.png").to_string_lossy().to_string();
        let cli = Cli::parse_from([
            "program", "-o", output_arg.as_str(), "-s", "42", "-c", "3", "-W", "5", "-H", "5", "-n",
            "2", "-q",
        ]);

        RunProcessor::new(cli).process().expect("runs should succeed");

        assert!(dir.path().join("map_0.png").exists());
        assert!(dir.path().join("map_1.png").exists());
        assert!(!dir.path().join("map.png").exists());
    }

    // Tests invalid arguments surface as configuration errors
    // Verified by clamping dimensions instead of validating them
    #[test]
    fn test_process_rejects_invalid_configuration() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output_arg = dir.path().join("map.png").to_string_lossy().to_string();

        let narrow = Cli::parse_from(["program", "-o", output_arg.as_str(), "-s", "1", "-W", "2", "-q"]);
        let error = RunProcessor::new(narrow)
            .process()
            .expect_err("width 2 is below the minimum");
        assert!(error.is_configuration_error());

        let no_runs = Cli::parse_from(["program", "-o", output_arg.as_str(), "-s", "1", "-n", "0", "-q"]);
        let error = RunProcessor::new(no_runs)
            .process()
            .expect_err("zero runs are rejected");
        assert!(error.is_configuration_error());
    }

    // Tests an empty layout writes nothing
    // Verified by exporting empty rasters
    #[test]
    fn test_process_zero_chunks() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("map.png");
        let output_arg = output.to_string_lossy().to_string();
        let cli = Cli::parse_from(["program", "-o", output_arg.as_str(), "-s", "1", "-c", "0", "-q"]);

        RunProcessor::new(cli).process().expect("nothing to generate");

        assert!(!output.exists());
    }
}
