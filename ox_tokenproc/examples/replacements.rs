use ox_tokenproc::{TokenReplacer, parse_config};

fn main() -> anyhow::Result<()> {
    let config = parse_config(
        r#"
app:
  name: "my app"
  region: us-east
  endpoint: "https://${app.region}.example.org"
"#,
        "yaml",
    )?;

    let template = [
        "# ${app.name}.title\n",
        "endpoint = ${app.endpoint}\n",
        "region = ${app.region.upper}\n",
        "owner = ${app.owner}\n",
    ];

    let mut replacer = TokenReplacer::new(&config);
    for line in template {
        print!("{}", replacer.process_line(line));
    }

    if !replacer.all_resolved() {
        eprintln!("{}", replacer.diagnostics().summary());
    }
    Ok(())
}
