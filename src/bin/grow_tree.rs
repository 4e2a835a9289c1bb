use rusty_trees::data::dataset::Dataset;
use rusty_trees::trees::classifier::DecisionTreeClassifier;
use std::error::Error;
use std::process;

fn grow_tree(path: &str, label: &str, criterion: Option<&str>) -> Result<(), Box<dyn Error>> {
    let dataset = Dataset::from_csv_path(path, label)?;
    println!(
        "Loaded {} examples with {} attributes",
        dataset.nrows(),
        dataset.attributes().len()
    );

    let mut classifier = DecisionTreeClassifier::new();
    if let Some(criterion) = criterion {
        classifier.params_mut().set_criterion(criterion)?;
    }
    classifier.fit(&dataset)?;

    if let Some(root) = classifier.root() {
        println!("{}", root);
    }

    let predictions = classifier.predict(&dataset)?;
    let mut correct = 0;
    for (row, prediction) in predictions.iter().enumerate() {
        if dataset.example(row).label() == Some(prediction.as_str()) {
            correct += 1;
        }
    }
    println!(
        "Training accuracy: {}%",
        (correct as f64 / dataset.nrows() as f64) * 100.0
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <csv-file> <label-column> [criterion]", args[0]);
        process::exit(2);
    }

    if let Err(err) = grow_tree(&args[1], &args[2], args.get(3).map(String::as_str)) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
