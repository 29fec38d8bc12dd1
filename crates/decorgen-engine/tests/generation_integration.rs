//! Integration tests for complete generation passes
//!
//! Every test runs against the catalog in `fixtures/catalog.json`, the way a
//! host would hand metadata over.

use decorgen_engine::{
    CancellationToken, GenerationError, GenerationOutput, Generator, GeneratorConfig,
    MetadataCatalog, SourceArtifact, SourceLocation, Trigger, TypeReference,
};

const CATALOG: &str = include_str!("fixtures/catalog.json");

fn catalog() -> MetadataCatalog {
    MetadataCatalog::from_json(CATALOG).expect("fixture catalog should parse")
}

fn reference(fqn: &str) -> TypeReference {
    let short = fqn.rsplit('.').next().unwrap_or(fqn);
    TypeReference::named(fqn, short)
}

fn trigger(contract: &str, provider: &str, line: u32) -> Trigger {
    Trigger::new(reference(contract), reference(provider))
        .at(SourceLocation::new("Program.cs", 0, 40, line, 9))
}

fn run(catalog: &MetadataCatalog, config: GeneratorConfig, triggers: &[Trigger]) -> GenerationOutput {
    Generator::new(catalog, config)
        .generate(triggers, &CancellationToken::new())
        .expect("pass should not be cancelled")
}

fn artifact<'a>(output: &'a GenerationOutput, name: &str) -> &'a SourceArtifact {
    output
        .artifacts
        .iter()
        .find(|a| a.name == name)
        .unwrap_or_else(|| panic!("missing artifact {}", name))
}

fn mixed_triggers() -> Vec<Trigger> {
    vec![
        trigger("global::Acme.IStarter", "global::Acme.Logging.LoggingProvider", 3),
        trigger("global::Acme.IExchange", "global::Acme.Logging.LoggingProvider", 4),
        trigger("global::Acme.IBoth", "global::Acme.Metrics.LoggingProvider", 5),
        trigger("global::Acme.Service", "global::Acme.Logging.LoggingProvider", 6),
        trigger("global::Acme.IStarter", "global::Acme.Logging.LoggingProvider", 7),
    ]
}

#[test]
fn test_logging_provider_wraps_start() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[trigger("global::Acme.IStarter", "global::Acme.Logging.LoggingProvider", 1)],
    );
    assert!(output.diagnostics.is_empty());

    let proxy = artifact(&output, "Decorator_LoggingProvider_IStarter.g.cs");
    let text = &proxy.text;
    assert!(text.contains("namespace Decorators.LoggingProvider.IStarter"));
    assert!(text.contains(
        "void global::Acme.IStarter.Start(global::System.Object a, global::System.Object b, global::System.Object c)"
    ));
    assert!(text.contains("this._behaviorProvider.Process(in methodContext, static (context) =>"));

    // The underlying call happens once inside the hook and once on the bypass path only.
    let inner = "context.underlyingImplementation.Start(context.a, context.b, context.c);";
    assert_eq!(text.matches(inner).count(), 1);
    assert_eq!(text.matches("this._underlyingImplementation.Start(a, b, c);").count(), 1);
}

#[test]
fn test_pass_is_deterministic() {
    let catalog = catalog();
    let first = run(&catalog, GeneratorConfig::default(), &mixed_triggers());
    let second = run(&catalog, GeneratorConfig::default(), &mixed_triggers());

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_parallel_matches_sequential() {
    let catalog = catalog();
    let sequential = run(&catalog, GeneratorConfig::default(), &mixed_triggers());
    let parallel = run(
        &catalog,
        GeneratorConfig {
            parallel: true,
            ..GeneratorConfig::default()
        },
        &mixed_triggers(),
    );
    assert_eq!(sequential, parallel);
}

#[test]
fn test_artifact_order_and_dispatcher() {
    let catalog = catalog();
    let output = run(&catalog, GeneratorConfig::default(), &mixed_triggers());

    let names: Vec<&str> = output.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names.len(), 4);
    assert!(names[0].ends_with("_IStarter.g.cs"));
    assert!(names[1].ends_with("_IExchange.g.cs"));
    assert!(names[2].ends_with("_IBoth.g.cs"));
    assert_eq!(names[3], "DecoratorDispatcher.g.cs");

    let dispatcher = &output.artifacts[3].text;
    let starter = dispatcher.find("typeof(global::Acme.IStarter)").unwrap();
    let exchange = dispatcher.find("typeof(global::Acme.IExchange)").unwrap();
    let both = dispatcher.find("typeof(global::Acme.IBoth)").unwrap();
    assert!(starter < exchange && exchange < both);
    assert!(dispatcher.contains("// LoggingProvider(global::Acme.Logging.ILogSink sink)"));
    assert_eq!(dispatcher.matches("return default;").count(), 2);
}

#[test]
fn test_colliding_provider_names_disambiguated() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[
            trigger("global::Acme.IStarter", "global::Acme.Logging.LoggingProvider", 1),
            trigger("global::Acme.IStarter", "global::Acme.Metrics.LoggingProvider", 2),
            trigger("global::Acme.IExchange", "global::Acme.Logging.LoggingProvider", 3),
        ],
    );
    assert!(output.diagnostics.is_empty());

    let names: Vec<&str> = output.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_ne!(names[0], names[1]);
    for name in &names[..3] {
        assert!(name.starts_with("Decorator_LoggingProvider_"), "{}", name);
    }

    let segment = |name: &str| {
        name.trim_start_matches("Decorator_LoggingProvider_")
            .split('_')
            .next()
            .unwrap_or_default()
            .to_string()
    };
    let logging = segment(names[0]);
    assert_eq!(logging.len(), 10);
    assert!(logging.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    assert_eq!(segment(names[2]), logging);
    assert_ne!(segment(names[1]), logging);
}

#[test]
fn test_hash_length_is_configurable() {
    let catalog = catalog();
    let config = GeneratorConfig::from_toml_str(
        r#"
root_namespace = "Acme.Generated"
hash_length = 16
"#,
    )
    .unwrap();
    let output = run(
        &catalog,
        config,
        &[
            trigger("global::Acme.IStarter", "global::Acme.Logging.LoggingProvider", 1),
            trigger("global::Acme.IStarter", "global::Acme.Metrics.LoggingProvider", 2),
        ],
    );

    let text = &output.artifacts[0].text;
    let line = text.lines().find(|l| l.starts_with("namespace ")).unwrap();
    let segment = line
        .trim_start_matches("namespace Acme.Generated.LoggingProvider_")
        .trim_end_matches(".IStarter");
    assert_eq!(segment.len(), 16);
}

#[test]
fn test_allow_list_bypasses_excluded_methods() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[trigger("global::Acme.IExchange", "global::Acme.Logging.LoggingProvider", 1)
            .allowing(["FetchAsync"])],
    );
    let text = &artifact(&output, "Decorator_LoggingProvider_IExchange.g.cs").text;

    assert!(text.contains(
        "global::System.Boolean global::Acme.IExchange.Swap(out global::System.Int32 x, ref global::System.Int32 y)\n        {\n            return this._underlyingImplementation.Swap(out x, ref y);\n        }\n"
    ));
    assert!(!text.contains("class SwapMethodContext_"));
    assert!(text.contains("nameof(global::Acme.IExchange.FetchAsync)"));
    assert!(text.contains(
        "var interceptorInvocationResult = this._behaviorProvider.ProcessWithReturnTypeAsync(methodContext, static (context) =>"
    ));
}

#[test]
fn test_ref_and_out_written_back() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[trigger("global::Acme.IExchange", "global::Acme.Logging.LoggingProvider", 1)],
    );
    let text = &artifact(&output, "Decorator_LoggingProvider_IExchange.g.cs").text;

    assert!(text.contains("var temp_1_y = context.y;"));
    assert!(text.contains(
        "var localResult = context.underlyingImplementation.Swap(out global::System.Int32 temp_0_x, ref temp_1_y);"
    ));
    assert!(text.contains("context.x = temp_0_x;"));
    assert!(text.contains("context.y = temp_1_y;"));
    assert!(text.contains("x = methodContext.x;"));
    assert!(text.contains("y = methodContext.y;"));

    // Accessor methods are emitted as properties, never as methods.
    assert!(!text.contains("get_Name"));
    assert!(text.contains("global::System.String global::Acme.IExchange.Name"));
    assert!(text.contains("throw new global::System.NotSupportedException();"));
}

#[test]
fn test_same_named_members_stay_separate() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[trigger("global::Acme.IBoth", "global::Acme.Metrics.LoggingProvider", 1)],
    );
    let text = &output.artifacts[0].text;

    assert!(text.contains("void global::Acme.ILeft.Foo()"));
    assert!(text.contains("void global::Acme.IRight.Foo()"));
    assert!(text.contains("class FooMethodContext_0"));
    assert!(text.contains("class FooMethodContext_1"));
    assert!(text.contains("((global::Acme.ILeft)context.underlyingImplementation).Foo();"));
    assert!(text.contains("((global::Acme.IRight)context.underlyingImplementation).Foo();"));
}

#[test]
fn test_ineligible_pairs_reported() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[
            trigger("global::Acme.Service", "global::Acme.Logging.LoggingProvider", 1),
            trigger("global::Acme.IStarter", "global::Acme.PlainProvider", 2),
            trigger("global::Acme.IEvented", "global::Acme.Logging.LoggingProvider", 3),
            trigger("global::Acme.IMissing", "global::Acme.Logging.LoggingProvider", 4),
            trigger("global::Acme.IStarter", "global::Acme.Logging.LoggingProvider", 5),
        ],
    );

    let codes: Vec<&str> = output.diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["DEC1001", "DEC1002", "DEC1005", "DEC1003"]);
    assert!(output.has_errors());
    assert_eq!(
        output.diagnostics[0].to_string(),
        "Program.cs:1:9: error[DEC1001]: Type 'global::Acme.Service' is not an interface and cannot be decorated"
    );

    // The eligible pair is still generated.
    assert_eq!(output.artifacts.len(), 2);
    assert_eq!(output.artifacts[0].name, "Decorator_LoggingProvider_IStarter.g.cs");
}

#[test]
fn test_provider_without_constructor_rejected() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[
            trigger("global::Acme.IStarter", "global::Acme.FactoryOnlyProvider", 1),
            trigger("global::Acme.IStarter", "global::Acme.Logging.LoggingProvider", 2),
        ],
    );

    let codes: Vec<&str> = output.diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["DEC1007"]);
    assert_eq!(
        output.diagnostics[0].to_string(),
        "Program.cs:1:9: error[DEC1007]: Provider 'global::Acme.FactoryOnlyProvider' has no accessible constructor"
    );
    assert!(output
        .artifacts
        .iter()
        .all(|a| !a.name.contains("FactoryOnlyProvider") && !a.text.contains("FactoryOnlyProvider")));
    assert_eq!(output.artifacts.len(), 2);
}

#[test]
fn test_light_awaitables_and_generics() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[trigger("global::Acme.IPipeline", "global::Acme.Logging.LoggingProvider", 1)],
    );
    assert!(output.diagnostics.is_empty());
    let text = &artifact(&output, "Decorator_LoggingProvider_IPipeline.g.cs").text;

    assert!(text.contains(
        "global::System.Threading.Tasks.ValueTask global::Acme.IPipeline.FlushAsync()"
    ));
    assert!(text.contains(
        "var interceptorInvocationResult = this._behaviorProvider.ProcessValueTaskAsync(methodContext, static (context) =>"
    ));

    assert!(text.contains(
        "global::System.Threading.Tasks.ValueTask<global::System.Int32> global::Acme.IPipeline.ReadAsync(in global::System.Int64 offset)"
    ));
    assert!(text.contains(
        "var interceptorInvocationResult = this._behaviorProvider.ProcessWithReturnTypeValueTaskAsync(methodContext, static (context) =>"
    ));
    assert!(text.contains("var temp_0_offset = context.offset;"));
    assert!(text.contains("context.underlyingImplementation.ReadAsync(in temp_0_offset);"));
    assert!(!text.contains("context.offset = temp_0_offset;"));
    assert!(!text.contains("ValueTaskAsync(in methodContext"));

    assert!(text.contains("private sealed class TransformMethodContext_2<TIn>"));
    assert!(text.contains("TOut global::Acme.IPipeline.Transform<TIn, TOut>(TIn input, in global::System.Int32 scale)"));
    assert!(text.contains("var methodContext = new TransformMethodContext_2<TIn>"));
    assert!(text.contains(
        "var interceptorInvocationResult = this._behaviorProvider.ProcessWithReturnType(in methodContext, static (context) =>"
    ));
    assert!(text.contains("var localResult = context.underlyingImplementation.Transform<TIn, TOut>(context.input, in temp_1_scale);"));
    assert!(text.contains("return this._underlyingImplementation.Transform<TIn, TOut>(input, in scale);"));
}

#[test]
fn test_qualified_allow_list_entry_selects_one_contract() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[trigger("global::Acme.IBoth", "global::Acme.Metrics.LoggingProvider", 1)
            .allowing(["IRight.Foo"])],
    );
    let text = &output.artifacts[0].text;

    assert!(text.contains(
        "void global::Acme.ILeft.Foo()\n        {\n            ((global::Acme.ILeft)this._underlyingImplementation).Foo();\n        }\n"
    ));
    assert!(!text.contains("class FooMethodContext_0"));
    assert!(text.contains("class FooMethodContext_1"));
    assert!(text.contains("!this._applicableMembers.Contains(\"IRight.Foo\") &&"));
    assert!(text.contains("!this._applicableMembers.Contains(\"global::Acme.IRight.Foo\"))"));
}

#[test]
fn test_repeated_trigger_reports_every_location() {
    let catalog = catalog();
    let output = run(
        &catalog,
        GeneratorConfig::default(),
        &[
            trigger("global::Acme.Service", "global::Acme.Logging.LoggingProvider", 10),
            trigger("global::Acme.Service", "global::Acme.Logging.LoggingProvider", 20),
        ],
    );
    let lines: Vec<u32> = output
        .diagnostics
        .iter()
        .filter_map(|d| d.location.as_ref().map(|l| l.line))
        .collect();
    assert_eq!(lines, vec![10, 20]);
    assert_eq!(output.artifacts.len(), 1);
}

#[test]
fn test_cancelled_pass_yields_no_artifacts() {
    let catalog = catalog();
    let generator = Generator::new(&catalog, GeneratorConfig::default());
    let cancel = CancellationToken::new();
    let handle = cancel.clone();
    handle.cancel();

    let result = generator.generate(&mixed_triggers(), &cancel);
    assert!(matches!(result, Err(GenerationError::Cancelled)));
}

#[test]
fn test_triggers_load_from_json() {
    let catalog = catalog();
    let triggers: Vec<Trigger> = serde_json::from_str(
        r#"[
            {
                "contract": { "fully_qualified_name": "global::Acme.IStarter", "short_name": "IStarter" },
                "provider": { "fully_qualified_name": "global::Acme.Logging.LoggingProvider", "short_name": "LoggingProvider" },
                "locations": [ { "file": "Startup.cs", "start": 120, "end": 180, "line": 12, "column": 5 } ],
                "allow_list": ["Start"]
            }
        ]"#,
    )
    .unwrap();

    let output = run(&catalog, GeneratorConfig::default(), &triggers);
    assert!(output.diagnostics.is_empty());
    assert!(output.artifacts[0]
        .text
        .contains("nameof(global::Acme.IStarter.Start)"));
}
