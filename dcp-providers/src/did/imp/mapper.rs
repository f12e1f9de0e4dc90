use crate::did::{
    imp::dto::{DidDocumentDTO, DidServiceDTO, DidVerificationMethodDTO},
    model::{DidDocument, DidService, DidVerificationMethod},
};

impl From<DidDocumentDTO> for DidDocument {
    fn from(dto: DidDocumentDTO) -> Self {
        Self {
            context: dto.context,
            id: dto.id,
            verification_method: dto.verification_method.into_iter().map(Into::into).collect(),
            authentication: dto.authentication,
            assertion_method: dto.assertion_method,
            service: dto
                .service
                .map(|services| services.into_iter().flat_map(services_per_type).collect()),
            rest: dto.rest,
        }
    }
}

impl From<DidDocument> for DidDocumentDTO {
    fn from(document: DidDocument) -> Self {
        Self {
            context: document.context,
            id: document.id,
            verification_method: document
                .verification_method
                .into_iter()
                .map(Into::into)
                .collect(),
            authentication: document.authentication,
            assertion_method: document.assertion_method,
            service: document
                .service
                .map(|services| services.into_iter().map(Into::into).collect()),
            rest: document.rest,
        }
    }
}

/// `"type": ["CredentialService", "Other"]` yields one service per type, so lookups by
/// type stay a plain comparison.
fn services_per_type(dto: DidServiceDTO) -> impl Iterator<Item = DidService> {
    let DidServiceDTO {
        id,
        r#type,
        service_endpoint,
    } = dto;

    r#type.into_iter().map(move |r#type| DidService {
        id: id.clone(),
        r#type,
        service_endpoint: service_endpoint.clone(),
    })
}

impl From<DidVerificationMethodDTO> for DidVerificationMethod {
    fn from(dto: DidVerificationMethodDTO) -> Self {
        Self {
            id: dto.id,
            r#type: dto.r#type,
            controller: dto.controller,
            public_key_jwk: dto.public_key_jwk.into(),
        }
    }
}

impl From<DidVerificationMethod> for DidVerificationMethodDTO {
    fn from(method: DidVerificationMethod) -> Self {
        Self {
            id: method.id,
            r#type: method.r#type,
            controller: method.controller,
            public_key_jwk: method.public_key_jwk.into(),
        }
    }
}

impl From<DidService> for DidServiceDTO {
    fn from(service: DidService) -> Self {
        Self {
            id: service.id,
            r#type: vec![service.r#type],
            service_endpoint: service.service_endpoint,
        }
    }
}
