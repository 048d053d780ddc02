use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use quote::quote_spanned;
use std::path::Path;

/// Runs the annotated scenario against a local server replaying the given markdown.
///
/// ```ignore
/// #[apicheck_playback_test("playback_data/single_user.md", configure_session)]
/// fn single_user(session: &Session) -> Result<(), Error> { ... }
/// ```
#[proc_macro_attribute]
pub fn apicheck_playback_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    apicheck_test(attrs, item, Mode::Playback)
}

/// Runs the annotated scenario through the configured client (reqwest when
/// none is set) and saves the interactions to the given markdown. Ignored by
/// default.
#[proc_macro_attribute]
pub fn apicheck_record_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    apicheck_test(attrs, item, Mode::Record)
}

#[derive(Clone, Copy)]
enum Mode {
    Playback,
    Record,
}

fn apicheck_test(attrs: TokenStream, item: TokenStream, mode: Mode) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    let markdown_name: String;

    if args.len() < 2 {
        return quote! {
            compile_error!("A markdown name and a configuration function should be passed to the macro");
        }
        .into();
    }

    if let syn::NestedMeta::Lit(syn::Lit::Str(parsed_markdown_name)) = &args[0] {
        markdown_name = parsed_markdown_name.value();
        if let Err(stream) = validate_markdown_path(&markdown_name, parsed_markdown_name.span()) {
            return stream.into();
        }
    } else {
        return quote! {
            compile_error!("The first argument should be a string literal!");
        }
        .into();
    }

    let configuration_function;
    if let syn::NestedMeta::Meta(syn::Meta::Path(function_path)) = &args[1] {
        configuration_function = function_path;
    } else {
        let error = quote! {
            compile_error!("The second argument should be a configuration function!");
        };

        return error.into();
    }

    if let Err(stream) = validate_signature(&input.sig) {
        return stream.into();
    }

    let attributes = &input.attrs;
    let visibility = &input.vis;
    let test_name = &input.sig.ident;
    let block = &input.block;
    let mut scenario_signature = input.sig.clone();
    scenario_signature.ident = syn::Ident::new("__apicheck_scenario", Span::call_site());

    let markdown_path = quote! {
        concat!(env!("CARGO_MANIFEST_DIR"), "/", #markdown_name)
    };

    let body = match mode {
        Mode::Playback => quote! {
            let __apicheck_interactions = apicheck::markdown::load_markdown(#markdown_path)
                .unwrap_or_else(|e| panic!("apicheck error: couldn't load {}: {}", #markdown_name, e));
            let __apicheck_server = apicheck::PlaybackServer::start(__apicheck_interactions)
                .unwrap_or_else(|e| panic!("apicheck error: {}", e));
            let mut __apicheck_builder = apicheck::SessionBuilder::new();
            #configuration_function(&mut __apicheck_builder);
            __apicheck_builder.set_base_url(__apicheck_server.base_url());
            let __apicheck_session = __apicheck_builder
                .build()
                .unwrap_or_else(|e| panic!("apicheck error: {}", e));

            let __apicheck_result = __apicheck_scenario(&__apicheck_session);
            let __apicheck_playback = __apicheck_server.finish();

            if let Err(e) = __apicheck_result {
                panic!("Scenario `{}` failed: {}", stringify!(#test_name), e);
            }
            if let Err(e) = __apicheck_playback {
                panic!("apicheck playback error: {}", e);
            }
        },
        Mode::Record => quote! {
            let mut __apicheck_builder = apicheck::SessionBuilder::new();
            #configuration_function(&mut __apicheck_builder);
            // the recorder wraps the configured client, or a reqwest one
            let __apicheck_client: std::sync::Arc<dyn apicheck::HttpClient + Send + Sync> =
                match __apicheck_builder.http_client() {
                    Some(client) => client,
                    None => std::sync::Arc::new(
                        apicheck::ReqwestHttpClient::new(__apicheck_builder.timeout())
                            .unwrap_or_else(|e| panic!("apicheck error: {}", e)),
                    ),
                };
            let __apicheck_recorder =
                std::sync::Arc::new(apicheck::RecordingHttpClient::new(__apicheck_client));
            let __apicheck_session = __apicheck_builder
                .with_http_client(__apicheck_recorder.clone())
                .build()
                .unwrap_or_else(|e| panic!("apicheck error: {}", e));

            if let Err(e) = __apicheck_scenario(&__apicheck_session) {
                panic!("Scenario `{}` failed: {}", stringify!(#test_name), e);
            }
            if let Err(e) = __apicheck_recorder.save(#markdown_path) {
                panic!("apicheck error: couldn't save {}: {}", #markdown_name, e);
            }
        },
    };

    let ignore = match mode {
        Mode::Playback => quote! {},
        Mode::Record => quote! { #[ignore] },
    };

    let output = quote! {
        #(#attributes)*
        #[test]
        #ignore
        #visibility fn #test_name() {
            #scenario_signature #block

            apicheck::logging::init_test_logging();

            #body
        }
    };

    TokenStream::from(output)
}

fn validate_markdown_path<P: AsRef<Path>>(
    path: P,
    span: Span,
) -> Result<(), proc_macro2::TokenStream> {
    if !path.as_ref().to_string_lossy().ends_with(".md") {
        return Err(quote_spanned! {span=>
            compile_error!("The path should point to a .md file!");
        });
    }

    Ok(())
}

fn validate_signature(signature: &syn::Signature) -> Result<(), proc_macro2::TokenStream> {
    let span = signature.ident.span();

    if signature.inputs.len() != 1 {
        return Err(quote_spanned! {span=>
            compile_error!("The scenario should take exactly one `&Session` argument!");
        });
    }

    if let syn::ReturnType::Default = signature.output {
        return Err(quote_spanned! {span=>
            compile_error!("The scenario should return a Result!");
        });
    }

    Ok(())
}
