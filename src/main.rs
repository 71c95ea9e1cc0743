use clap::Parser;
use specialty_mapper_rust::{cli, config, error, loader, matcher, normalizer, pipeline};

use cli::{Cli, Commands};
use config::Config;
use error::Result;
use loader::rules::RuleStore;
use matcher::taxonomy::TaxonomyIndex;
use matcher::Matcher;
use normalizer::expander::SynonymExpander;
use normalizer::junk::JunkClassifier;
use normalizer::Normalizer;
use pipeline::Pipeline;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Preprocess { input, synonyms, out } => {
            println!("🩺 specialty-mapper - 前処理\n");

            println!("[1/3] シノニムルールを読み込み中...");
            let store = RuleStore::from_csv(&synonyms)?;
            report_rule_warnings(&store);
            println!("✔ {}件のルールを読み込み\n", store.len());

            println!("[2/3] 入力を読み込み中...");
            let (column, rows) = loader::read_input(&input)?;
            println!("✔ {}行を検出（列: {}）\n", rows.len(), column);

            println!("[3/3] 前処理中...");
            let normalizer = Normalizer::new(&config);
            let junk = JunkClassifier::new(&config);
            let expander = SynonymExpander::new(&store);
            // preprocessサーフェスはマッチングを行わないため空インデックスで可
            let index = TaxonomyIndex::build(Vec::new(), &normalizer);
            let matcher = Matcher::new(&index, &config);
            let pipeline = Pipeline::new(&normalizer, &junk, &expander, &matcher);

            let processed: Vec<(String, String, u8)> = rows
                .iter()
                .map(|row| {
                    let (text, is_junk) = pipeline.preprocess_one(&row.raw);
                    (row.raw.clone(), text, is_junk)
                })
                .collect();
            let junk_count = processed.iter().filter(|(_, _, j)| *j == 1).count();

            loader::write_preprocessed(&out, &processed)?;
            println!("✔ 結果を保存: {}（junk: {}行）", out.display(), junk_count);

            println!("\n✅ 前処理完了");
        }

        Commands::Map { input, nucc, synonyms, out, threshold } => {
            println!("🩺 specialty-mapper - マッピング\n");
            let config = override_threshold(config, threshold)?;
            run_mapping(&config, &input, &nucc, &synonyms, &out, None, cli.verbose)?;
            println!("\n✅ マッピング完了");
        }

        Commands::Run { input, nucc, synonyms, out, threshold, jobs } => {
            println!("🩺 specialty-mapper - 一括処理\n");
            let config = override_threshold(config, threshold)?;
            run_mapping(&config, &input, &nucc, &synonyms, &out, jobs, cli.verbose)?;
            println!("\n✅ 完了");
        }

        Commands::Config { set_threshold, show } => {
            let mut config = config;

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ マッピング閾値を設定しました: {}", threshold);
            }

            if show {
                println!("設定:");
                println!("  マッピング閾値: {}", config.map_threshold);
                println!("  トークン重複閾値: {}", config.token_threshold);
                println!("  あいまい一致閾値: {}", config.fuzzy_threshold);
                println!("  最大コード数: {}", config.max_codes);
                println!("  explain最大長: {}", config.explain_max_len);
            }
        }
    }

    Ok(())
}

fn override_threshold(mut config: Config, threshold: Option<f64>) -> Result<Config> {
    if let Some(threshold) = threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(error::SpecialtyMapperError::Config(format!(
                "閾値は0.0〜1.0で指定してください: {}",
                threshold
            )));
        }
        config.map_threshold = threshold;
    }
    Ok(config)
}

fn report_rule_warnings(store: &RuleStore) {
    if store.skipped_kinds() > 0 {
        println!("⚠️  未対応typeのルールをスキップ: {}行", store.skipped_kinds());
    }
    if store.dropped_noops() > 0 {
        println!("⚠️  無操作ルール（pattern==replacement）を除外: {}行", store.dropped_noops());
    }
}

fn run_mapping(
    config: &Config,
    input: &std::path::Path,
    nucc: &std::path::Path,
    synonyms: &std::path::Path,
    out: &std::path::Path,
    jobs: Option<usize>,
    verbose: bool,
) -> Result<()> {
    println!("[1/4] シノニムルールを読み込み中...");
    let store = RuleStore::from_csv(synonyms)?;
    report_rule_warnings(&store);
    println!("✔ {}件のルールを読み込み\n", store.len());

    println!("[2/4] タクソノミーを読み込み中...");
    let taxonomy_rows = loader::taxonomy::load_taxonomy(nucc)?;
    let normalizer = Normalizer::new(config);
    let index = TaxonomyIndex::build(taxonomy_rows, &normalizer);
    if index.empty_canonical() > 0 {
        println!("⚠️  カノニカルフレーズが空のエントリ: {}件", index.empty_canonical());
    }
    println!("✔ {}エントリ\n", index.len());

    println!("[3/4] 入力を読み込み中...");
    let (column, input_rows) = loader::read_input(input)?;
    println!("✔ {}行を検出（列: {}）\n", input_rows.len(), column);

    println!("[4/4] マッピング中...");
    let junk = JunkClassifier::new(config);
    let expander = SynonymExpander::new(&store);
    if expander.compile_failures() > 0 {
        println!("⚠️  コンパイル失敗でスキップしたルール: {}件", expander.compile_failures());
    }
    let matcher = Matcher::new(&index, config);
    let pipeline = Pipeline::new(&normalizer, &junk, &expander, &matcher);

    let work: Vec<(String, String, bool)> = input_rows
        .into_iter()
        .map(|row| (row.raw, row.text, row.pre_junk))
        .collect();

    let results = match jobs {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| error::SpecialtyMapperError::Config(e.to_string()))?;
            pool.install(|| pipeline.run(&work, !verbose))
        }
        None => pipeline.run(&work, !verbose),
    };

    let junk_count = results.iter().filter(|r| r.is_junk == 1).count();
    loader::write_output(out, &results)?;
    println!("✔ 結果を保存: {}（{}行、junk: {}行）", out.display(), results.len(), junk_count);

    Ok(())
}
