use super::*;
use crate::assembler::sources::MemorySources;
use crate::effect::selection::{EffectSelection, FunctionChoice};

fn setup(sel: &EffectSelection) -> (MemorySources, Library, ResolvedSelection) {
    let lib = Library::builtin().unwrap();
    let r = sel.resolve(&lib).unwrap();
    (MemorySources::builtin(), lib, r)
}

#[test]
fn template_args_follow_the_selection() {
    let mut sel = EffectSelection::default();
    sel.feedback.enabled = true;
    sel.feedback.warp = FunctionChoice::new("displace");
    sel.feedback.warp_noise = "value_3d".to_owned();
    let (_, lib, r) = setup(&sel);
    let args = template_args(&lib, &r).unwrap();
    assert_eq!(args["FB_ENABLED"], "1");
    assert_eq!(args["NOISE_MIN"], "-1.0");
    assert_eq!(args["NOISE_MAX"], "1.0");
    assert_eq!(args["MAX_WARP_PARAMS"], "8");
    assert_eq!(args["MAX_BLEND_PARAMS"], "3");
    assert_eq!(args["MAX_COLOR_PARAMS"], "16");
    assert_eq!(args["FB_WARP_FRACTAL_NOISE_VARIANT"], "paired");
    assert_eq!(args["FB_WARP_NOISE_FUNC"], "value_3d");
    assert_eq!(args["FB_WARP_XFORM_FUNC"], "displace");
    assert_eq!(args.len(), 12);
}

#[test]
fn glsl_float_literals() {
    assert_eq!(glsl_float(1.0), "1.0");
    assert_eq!(glsl_float(-1.0), "-1.0");
    assert_eq!(glsl_float(0.25), "0.25");
    assert_eq!(glsl_float(-0.5), "-0.5");
}

#[test]
fn assembled_program_is_complete() {
    let mut sel = EffectSelection::default();
    sel.feedback.enabled = true;
    let (store, lib, r) = setup(&sel);
    let p = assemble(&store, &lib, &r, &AssembleOptions::default()).unwrap();
    let text = p.fragment();
    assert!(text.starts_with("#version 330 core"));
    assert!(text.contains("#define FEEDBACK_ENABLED 1"));
    assert!(text.contains("#define NOISE_MIN (-1.0)"));
    assert!(text.contains("#define MAX_WARP_PARAMS 8"));
    assert!(text.contains("vec2 warp_offset("));
    assert!(text.contains("vec4 blend_linear("));
    assert!(text.contains("vec4 color_grayscale("));
    assert!(!text.contains("_FUNC>"));
    for name in p.manifest.uniform_names() {
        assert!(text.contains(name), "uniform {name} missing from program");
    }
    assert!(p.vertex().contains("v_tex"));
}

#[test]
fn annotated_program_marks_fragments() {
    let (store, lib, r) = setup(&EffectSelection::default());
    let opts = AssembleOptions {
        annotate_sources: true,
        ..AssembleOptions::default()
    };
    let p = assemble(&store, &lib, &r, &opts).unwrap();
    assert!(p.fragment().contains("////////// FILE: \"common.glsl\""));
    assert!(p.fragment().contains("////////// NOISE_FUNC=perlin_3d"));
    let plain = assemble(&store, &lib, &r, &AssembleOptions::default()).unwrap();
    assert_ne!(plain.source.key, p.source.key);
}

#[test]
fn missing_fragment_is_an_assembly_error() {
    let (mut store, lib, r) = setup(&EffectSelection::default());
    store.insert("blend/linear.glsl", "#include \"blend/gone.glsl\"\n");
    let err = assemble(&store, &lib, &r, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(err, PlasmaError::Assembly(_)));
    assert!(err.to_string().contains("blend/gone.glsl"));
}

#[test]
fn program_key_depends_on_every_argument() {
    let opts = AssembleOptions::default();
    let mut a = TemplateArgs::new();
    a.insert("NOISE_FUNC".to_owned(), "perlin_3d".to_owned());
    let mut b = a.clone();
    b.insert("NOISE_FUNC".to_owned(), "value_3d".to_owned());
    assert_eq!(program_key(&a, &opts), program_key(&a.clone(), &opts));
    assert_ne!(program_key(&a, &opts), program_key(&b, &opts));
}
