//! Build-time generator for Connect service stubs.
//!
//! Plugs into `prost-build` as a [`ServiceGenerator`]: for every protobuf
//! service it emits a `<service>_connect` module containing the service
//! name constants, a typed client, a handler trait, a route registrar and an
//! unimplemented handler. Generated code only depends on the `connect`
//! crate.

use prost_build::{Comments, Method, Service, ServiceGenerator};

/// Emits Connect stubs for unary protobuf services.
#[derive(Debug, Default)]
pub struct ConnectServiceGenerator {
    runtime: Option<String>,
}

impl ConnectServiceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the path of the runtime crate, `::connect` by default.
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime = Some(path.into());
        self
    }

    fn runtime(&self) -> &str {
        self.runtime.as_deref().unwrap_or("::connect")
    }
}

/// Returns a `prost_build::Config` that generates serde-enabled messages
/// and Connect stubs. Well-known types map to `pbjson_types` so timestamps
/// use their JSON mapping.
pub fn configure() -> prost_build::Config {
    let mut config = prost_build::Config::new();
    config
        .service_generator(Box::new(ConnectServiceGenerator::new()))
        .type_attribute(
            ".",
            "#[derive(::serde::Serialize, ::serde::Deserialize)]",
        )
        .type_attribute(".", "#[serde(rename_all = \"camelCase\", default)]")
        .extern_path(".google.protobuf", "::pbjson_types");
    config
}

impl ServiceGenerator for ConnectServiceGenerator {
    fn generate(&mut self, service: Service, buf: &mut String) {
        let full_name = if service.package.is_empty() {
            service.proto_name.clone()
        } else {
            format!("{}.{}", service.package, service.proto_name)
        };
        let snake = to_snake_case(&service.name);
        let upper = snake.to_ascii_uppercase();

        if let Some(method) = service
            .methods
            .iter()
            .find(|m| m.client_streaming || m.server_streaming)
        {
            buf.push_str(&format!(
                "compile_error!(\"{full_name}.{} is a streaming method; only \
                 unary methods are supported\");\n",
                method.proto_name
            ));
            return;
        }

        let methods: Vec<MethodDef<'_>> = service
            .methods
            .iter()
            .map(|method| MethodDef::new(&full_name, method))
            .collect();

        buf.push_str(&format!(
            "/// Connect stubs for `{full_name}`.\npub mod {snake}_connect {{\n"
        ));
        buf.push_str(&format!("    use {}::codegen::*;\n\n", self.runtime()));

        // Names.
        buf.push_str(&format!(
            "    /// Fully-qualified name of the service.\n    pub const \
             {upper}_NAME: &str = \"{full_name}\";\n"
        ));
        for m in &methods {
            buf.push_str(&format!(
                "    /// Path of `{full_name}.{}`.\n    pub const {}: &str = \
                 \"{}\";\n",
                m.method.proto_name, m.constant, m.path
            ));
        }
        buf.push_str("    /// Every procedure path of the service.\n");
        buf.push_str("    pub const PROCEDURES: &[&str] = &[\n");
        for m in &methods {
            buf.push_str(&format!("        {},\n", m.constant));
        }
        buf.push_str("    ];\n\n");

        self.client(&service, &methods, buf);
        self.handler_trait(&service, &methods, buf);
        self.registrar(&service, &full_name, &methods, buf);
        self.unimplemented(&service, &methods, buf);

        buf.push_str("}\n");
    }
}

struct MethodDef<'a> {
    method: &'a Method,
    constant: String,
    path: String,
    full_name: String,
    input: String,
    output: String,
}

impl<'a> MethodDef<'a> {
    fn new(service: &str, method: &'a Method) -> Self {
        Self {
            method,
            constant: format!(
                "{}_PROCEDURE",
                to_snake_case(&method.proto_name).to_ascii_uppercase()
            ),
            path: format!("/{service}/{}", method.proto_name),
            full_name: format!("{service}.{}", method.proto_name),
            input: type_path(&method.input_type),
            output: type_path(&method.output_type),
        }
    }

    fn signature(&self, receiver_arg: &str) -> String {
        format!(
            "async fn {}(&self, {receiver_arg}: Request<{}>) -> \
             Result<Response<{}>, ConnectError>",
            self.method.name, self.input, self.output
        )
    }
}

impl ConnectServiceGenerator {
    fn client(
        &self,
        service: &Service,
        methods: &[MethodDef<'_>],
        buf: &mut String,
    ) {
        let client = format!("{}Client", service.name);
        push_comments(buf, "    ", &service.comments);
        buf.push_str("    #[derive(Debug, Clone)]\n");
        buf.push_str(&format!("    pub struct {client} {{\n"));
        for m in methods {
            buf.push_str(&format!(
                "        {}: UnaryClient<{}, {}>,\n",
                m.method.name, m.input, m.output
            ));
        }
        buf.push_str("    }\n\n");

        buf.push_str(&format!("    impl {client} {{\n"));
        buf.push_str(
            "        /// Binds every procedure of the service to `base_url`.\n",
        );
        buf.push_str(
            "        pub fn new<C>(http_client: C, base_url: &str, options: \
             ClientOptions) -> Self\n        where\n            C: \
             HttpClient + 'static,\n        {\n",
        );
        buf.push_str(
            "            let http_client: Arc<dyn HttpClient> = \
             Arc::new(http_client);\n",
        );
        buf.push_str("            let options = Arc::new(options);\n");
        buf.push_str("            Self {\n");
        for m in methods {
            buf.push_str(&format!(
                "                {}: UnaryClient::new(http_client.clone(), \
                 base_url, {}, options.clone()),\n",
                m.method.name, m.constant
            ));
        }
        buf.push_str("            }\n        }\n");
        for m in methods {
            buf.push('\n');
            push_comments(buf, "        ", &m.method.comments);
            buf.push_str(&format!(
                "        pub {} {{\n            \
                 self.{}.call_unary(request).await\n        }}\n",
                m.signature("request"),
                m.method.name
            ));
        }
        buf.push_str("    }\n\n");
    }

    fn handler_trait(
        &self,
        service: &Service,
        methods: &[MethodDef<'_>],
        buf: &mut String,
    ) {
        buf.push_str(&format!(
            "    /// Server-side implementation of the `{}` service.\n",
            service.proto_name
        ));
        buf.push_str("    #[async_trait]\n");
        buf.push_str(&format!(
            "    pub trait {}Handler: Send + Sync + 'static {{\n",
            service.name
        ));
        for (i, m) in methods.iter().enumerate() {
            if i > 0 {
                buf.push('\n');
            }
            push_comments(buf, "        ", &m.method.comments);
            buf.push_str(&format!("        {};\n", m.signature("request")));
        }
        buf.push_str("    }\n\n");
    }

    fn registrar(
        &self,
        service: &Service,
        full_name: &str,
        methods: &[MethodDef<'_>],
        buf: &mut String,
    ) {
        buf.push_str(
            "    /// Returns the mount prefix of the service and a router \
             with one route\n    /// per procedure.\n",
        );
        buf.push_str(&format!(
            "    pub fn {}_handler<T>(svc: T, options: HandlerOptions) -> \
             (&'static str, Router)\n    where\n        T: {}Handler,\n    \
             {{\n",
            to_snake_case(&service.name),
            service.name
        ));
        buf.push_str("        let svc = Arc::new(svc);\n");
        buf.push_str("        let options = Arc::new(options);\n");
        buf.push_str("        let router = Router::new()");
        for m in methods {
            buf.push_str(&format!(
                "\n            .route({constant}, {{\n",
                constant = m.constant
            ));
            buf.push_str("                let svc = svc.clone();\n");
            buf.push_str(&format!(
                "                unary_handler(\n                    \
                 {constant},\n                    move |request: \
                 Request<{input}>| {{\n                        let svc = \
                 svc.clone();\n                        async move {{ \
                 svc.{name}(request).await }}\n                    }},\n",
                constant = m.constant,
                input = m.input,
                name = m.method.name,
            ));
            buf.push_str(
                "                    options.clone(),\n                )\n",
            );
            buf.push_str("            })");
        }
        buf.push_str(";\n");
        buf.push_str(&format!(
            "        (\"/{full_name}/\", router)\n    }}\n\n"
        ));
    }

    fn unimplemented(
        &self,
        service: &Service,
        methods: &[MethodDef<'_>],
        buf: &mut String,
    ) {
        let name = format!("Unimplemented{}Handler", service.name);
        buf.push_str(
            "    /// Answers every procedure with `Code::Unimplemented`.\n",
        );
        buf.push_str("    #[derive(Debug, Clone, Copy, Default)]\n");
        buf.push_str(&format!("    pub struct {name};\n\n"));
        buf.push_str("    #[async_trait]\n");
        buf.push_str(&format!(
            "    impl {}Handler for {name} {{\n",
            service.name
        ));
        for (i, m) in methods.iter().enumerate() {
            if i > 0 {
                buf.push('\n');
            }
            buf.push_str(&format!(
                "        {} {{\n            Err(ConnectError::new(\n          \
                 \x20     Code::Unimplemented,\n                \"{} is not \
                 implemented\",\n            ))\n        }}\n",
                m.signature("_request"),
                m.full_name
            ));
        }
        buf.push_str("    }\n");
    }
}

// Types outside the current package are already absolute.
fn type_path(ty: &str) -> String {
    if ty.starts_with("::") || ty.starts_with("crate::") {
        ty.to_owned()
    } else {
        format!("super::{ty}")
    }
}

fn push_comments(buf: &mut String, indent: &str, comments: &Comments) {
    for line in &comments.leading {
        let line = line.trim_end();
        if line.is_empty() {
            buf.push_str(&format!("{indent}///\n"));
        } else {
            buf.push_str(&format!("{indent}///{line}\n"));
        }
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let prev_lower = matches!(prev, Some('a'..='z' | '0'..='9'));
            let prev_upper = matches!(prev, Some('A'..='Z'));
            let next_lower = matches!(chars.get(i + 1), Some('a'..='z'));
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
