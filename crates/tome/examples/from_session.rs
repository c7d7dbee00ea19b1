//! Example: Documenting declarations supplied in memory
//!
//! This example builds a documentation model from a hand-written
//! [`StaticSession`], reports its warnings and prints the Markdown pages,
//! without touching the file system.

use tome::{
    Documenter,
    config::AppConfig,
    declaration::{Declaration, ParameterDeclaration, SourceFragment, StaticSession, TypeName},
    model::EntityKind,
    render::Format,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building documentation from an in-memory session...\n");

    let greeter = Declaration::new("Greeter", EntityKind::Class)
        .with_doc("Greets people by name. See [greet].")
        .with_child(
            Declaration::new("greet", EntityKind::Function)
                .with_parameter(ParameterDeclaration::new("name", TypeName::simple("String")))
                .with_returns(TypeName::simple("String"))
                .with_doc("Builds the greeting.\n\n@param name who to greet\n@return the greeting"),
        )
        .with_child(
            Declaration::new("shout", EntityKind::Function)
                .with_doc("Like [greet], but louder. Unlike [Whisperer], which does not exist."),
        );

    let session = StaticSession::new(vec![
        SourceFragment::new("src/demo/Greeter.kt", "demo").with_declaration(greeter),
    ]);

    let documenter = Documenter::new(AppConfig::default().with_format(Format::Markdown));
    let output = documenter.build(&session);

    println!("Warnings: {}", output.diagnostics().len());
    for diagnostic in output.diagnostics() {
        println!("  {diagnostic}");
    }

    for (path, page) in documenter.render(&output)? {
        println!("\n==> {} <==\n{page}", path.display());
    }

    Ok(())
}
