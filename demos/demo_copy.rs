use optlex::{
    Converted, Dialect, OptionCollection, OptionDefinition, OptionStyle, ScalarType, TargetShape,
};

fn main() {
    let mut collection = OptionCollection::new(Dialect::Universal);
    collection
        .register(
            OptionDefinition::new("source", OptionStyle::Collection)
                .keys(["s", "source"])
                .required()
                .shape(TargetShape::ListOf(ScalarType::Text)),
        )
        .expect("valid option");
    collection
        .register(
            OptionDefinition::new("retries", OptionStyle::SingleValued)
                .key("retries")
                .default_value("3")
                .shape(TargetShape::Scalar(ScalarType::Int)),
        )
        .expect("valid option");
    collection
        .register(
            OptionDefinition::new("verbose", OptionStyle::Switch)
                .keys(["v", "verbose"])
                .shape(TargetShape::Scalar(ScalarType::Bool)),
        )
        .expect("valid option");

    if let Err(error) = collection.parse_env() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    let diagnostics = collection.diagnostics();

    if !diagnostics.is_empty() {
        for diagnostic in diagnostics {
            eprintln!("{diagnostic}");
        }
        std::process::exit(1);
    }

    let sources = collection.get_value("source").expect("diagnosed above");
    let retries: i32 = collection
        .get_value("retries")
        .ok()
        .and_then(Converted::into_scalar)
        .and_then(|value| value.try_into().ok())
        .unwrap_or_default();
    let verbose = collection
        .option("verbose")
        .and_then(|option| option.command_line_key_provided())
        .is_some();

    println!("Sources: {:?}", sources.into_values());
    println!("Retries: {retries}");
    println!("Verbose: {verbose}");
}
