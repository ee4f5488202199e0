use utoipa::{
    IntoParams, OpenApi, ToSchema,
    openapi::{
        ContentBuilder, RefOr, Required, ResponseBuilder,
        path::{
            HttpMethod, Operation, OperationBuilder, Parameter, ParameterBuilder, ParameterIn,
            PathItem, PathItemBuilder, PathsBuilder,
        },
        request_body::RequestBodyBuilder,
        response::Response,
        schema::{Array, Ref, Schema},
    },
};

use crate::{
    entity::Entity,
    errors::ErrorBody,
    models::{
        Article, GenericMessage, HelpRequest, MenuItemReview, UcsbDate, UcsbDiningCommons,
        UcsbDiningCommonsMenuItem, UcsbOrganization,
    },
};

/// ApiDoc
///
/// The static half of the OpenAPI document: every schema used in request and
/// response bodies. The paths are generated per entity by `api_doc`, because all
/// entities share the same generic handlers.
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            Article, HelpRequest, MenuItemReview, UcsbDiningCommonsMenuItem,
            UcsbOrganization, UcsbDate, UcsbDiningCommons, ErrorBody, GenericMessage,
        )
    ),
    tags(
        (name = "ucsb-api", description = "UCSB CRUD API")
    )
)]
struct ApiDoc;

/// api_doc
///
/// The full OpenAPI document served at `/api-docs/openapi.json`.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let paths = PathsBuilder::new();
    let paths = entity_paths::<Article>(paths);
    let paths = entity_paths::<HelpRequest>(paths);
    let paths = entity_paths::<MenuItemReview>(paths);
    let paths = entity_paths::<UcsbDiningCommonsMenuItem>(paths);
    let paths = entity_paths::<UcsbOrganization>(paths);
    let paths = entity_paths::<UcsbDate>(paths);
    let paths = entity_paths::<UcsbDiningCommons>(paths);
    doc.paths = paths.build();
    doc
}

fn entity_paths<E>(paths: PathsBuilder) -> PathsBuilder
where
    E: Entity + ToSchema,
    E::Params: IntoParams,
{
    let name = E::name().to_string();
    let tag = E::NAME;

    let list = OperationBuilder::new()
        .operation_id(Some(format!("list{name}")))
        .summary(Some(format!("List all {}", E::NAME)))
        .tag(tag)
        .response("200", json_response("All records", array_of(&name)))
        .response("403", described("Not a USER"))
        .build();

    let get = OperationBuilder::new()
        .operation_id(Some(format!("get{name}")))
        .summary(Some(format!("Get a single {}", E::NAME)))
        .tag(tag)
        .parameter(id_parameter::<E>())
        .response("200", json_response("Found", Ref::from_schema_name(name.clone())))
        .response("404", json_response("Not found", Ref::from_schema_name("ErrorBody")))
        .build();

    let create = OperationBuilder::new()
        .operation_id(Some(format!("create{name}")))
        .summary(Some(format!("Create a new {}", E::NAME)))
        .tag(tag)
        .parameters(Some(E::Params::into_params(|| Some(ParameterIn::Query))))
        .response("200", json_response("Created", Ref::from_schema_name(name.clone())))
        .response("403", described("Not an ADMIN"))
        .build();

    let update = OperationBuilder::new()
        .operation_id(Some(format!("update{name}")))
        .summary(Some(format!("Update a single {}", E::NAME)))
        .tag(tag)
        .parameter(id_parameter::<E>())
        .request_body(Some(
            RequestBodyBuilder::new()
                .content(
                    "application/json",
                    ContentBuilder::new()
                        .schema(Some(Ref::from_schema_name(name.clone())))
                        .build(),
                )
                .required(Some(Required::True))
                .build(),
        ))
        .response("200", json_response("Updated", Ref::from_schema_name(name.clone())))
        .response("404", json_response("Not found", Ref::from_schema_name("ErrorBody")))
        .build();

    let delete = OperationBuilder::new()
        .operation_id(Some(format!("delete{name}")))
        .summary(Some(format!("Delete a {}", E::NAME)))
        .tag(tag)
        .parameter(id_parameter::<E>())
        .response("200", json_response("Deleted", Ref::from_schema_name("GenericMessage")))
        .response("404", json_response("Not found", Ref::from_schema_name("ErrorBody")))
        .build();

    paths
        .path(format!("{}/all", E::PATH), single(HttpMethod::Get, list))
        .path(format!("{}/post", E::PATH), single(HttpMethod::Post, create))
        .path(
            E::PATH,
            PathItemBuilder::new()
                .operation(HttpMethod::Get, get)
                .operation(HttpMethod::Put, update)
                .operation(HttpMethod::Delete, delete)
                .build(),
        )
}

fn single(method: HttpMethod, operation: Operation) -> PathItem {
    PathItemBuilder::new().operation(method, operation).build()
}

fn id_parameter<E: Entity>() -> Parameter {
    ParameterBuilder::new()
        .name(E::ID_PARAM)
        .parameter_in(ParameterIn::Query)
        .required(Required::True)
        .description(Some(format!("Primary key of the {}", E::NAME)))
        .build()
}

fn array_of(name: &str) -> RefOr<Schema> {
    RefOr::T(Schema::Array(Array::new(Ref::from_schema_name(name))))
}

fn described(description: &str) -> RefOr<Response> {
    RefOr::T(ResponseBuilder::new().description(description).build())
}

fn json_response(description: &str, schema: impl Into<RefOr<Schema>>) -> RefOr<Response> {
    RefOr::T(
        ResponseBuilder::new()
            .description(description)
            .content(
                "application/json",
                ContentBuilder::new().schema(Some(schema)).build(),
            )
            .build(),
    )
}
