//! Demonstrates compiling templates in both output modes

use moontpl::{CompileOptions, Compiler, Delimiters, Dependencies, OutputMode};

fn main() {
    let examples = vec![
        ("Greeting", "Hello, {{ name }}!"),
        ("Member access", "{{ user.profile.name }} ({{ user.age }})"),
        ("Object literal", "{{ { key: value, other: 'text' } }}"),
        ("Quotes and newlines", "She said \"{{ quote }}\"\nthen left."),
        ("Unclosed tag", "broken {{ tag"),
    ];

    for mode in [OutputMode::StringLiteral, OutputMode::Code] {
        let compiler = match Compiler::new(CompileOptions {
            mode,
            ..CompileOptions::default()
        }) {
            Ok(compiler) => compiler,
            Err(e) => {
                eprintln!("Invalid options: {}", e);
                return;
            }
        };

        println!("=== {:?} mode ===", mode);
        for (name, template) in &examples {
            let mut deps = Dependencies::new();
            match compiler.compile(template, &mut deps) {
                Ok(output) => {
                    println!("{}:", name);
                    println!("  output: {}", mode.wrap(&output));
                    println!("  dependencies: {:?}", deps.to_vec());
                }
                Err(e) => println!("{}: error: {}", name, e),
            }
        }
        println!();
    }

    // Custom delimiters
    let compiler = Compiler::new(CompileOptions {
        delimiters: Delimiters::new("<%", "%>"),
        ..CompileOptions::default()
    });
    if let Ok(compiler) = compiler {
        let mut deps = Dependencies::new();
        if let Ok(output) = compiler.compile("<% greeting %>, <%who%>", &mut deps) {
            println!(
                "Custom delimiters: {} -> {:?}",
                OutputMode::StringLiteral.wrap(&output),
                deps.to_vec()
            );
        }
    }
}
