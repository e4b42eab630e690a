use optlex::derive::*;
use optlex::prelude::*;
use optlex::{
    Dialect, EnumValue, OptionCollection, OptionDefinition, OptionStyle, ScalarType, TargetShape,
};

#[derive(Debug, PartialEq, CliEnum)]
#[optlex(flags)]
enum Permission {
    Nothing = 0,
    Read = 1,
    Write = 2,
    #[optlex(name = "exec")]
    Execute = 4,
}

fn main() {
    let mut collection = OptionCollection::new(Dialect::Linux);
    collection
        .register(
            OptionDefinition::new("permissions", OptionStyle::ConcatenatedSingleValue)
                .keys(["p", "permissions"])
                .shape(TargetShape::Scalar(ScalarType::enumeration::<Permission>())),
        )
        .expect("valid option");

    if let Err(error) = collection.parse_env() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    match collection
        .get_value("permissions")
        .map(|converted| converted.into_scalar().and_then(|value| EnumValue::try_from(value).ok()))
    {
        Ok(Some(permissions)) => println!("Granted: {:?}", permissions.variants::<Permission>()),
        Ok(None) => println!("Granted: nothing"),
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}
