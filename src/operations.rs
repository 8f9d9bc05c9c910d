//! GraphQL documents for the operations the CLI issues.

/// A named remote query or mutation.
///
/// `name` is the top-level field the response payload is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Top-level response field.
    pub name: &'static str,
    /// GraphQL document text.
    pub document: &'static str,
}

/// Exchange an email and password for a bearer token.
pub const LOGIN: Operation = Operation {
    name: "login",
    document: r"
mutation login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    token
    email
    languages
    profile {
      id
      handle
      name
      bio
      image
    }
  }
}
",
};

/// Cheap authenticated query used to check a stored token.
pub const PROBE: Operation = Operation {
    name: "me",
    document: r"
query me {
  me {
    email
  }
}
",
};

/// Books the profile is currently reading.
pub const READING_LIST: Operation = Operation {
    name: "booksByReadingStateAndProfile",
    document: r"
query booksByReadingStateAndProfile(
  $limit: Int!
  $offset: Int!
  $readingStatus: ReadingStatus!
  $profileId: String!
) {
  booksByReadingStateAndProfile(
    limit: $limit
    offset: $offset
    readingStatus: $readingStatus
    profileId: $profileId
  ) {
    id
    slug
    title
    subtitle
    authors {
      id
      name
    }
  }
}
",
};

/// Request a pre-signed URL for a cover upload.
pub const SIGNED_UPLOAD_URL: Operation = Operation {
    name: "getSignedUploadUrl",
    document: r"
mutation getSignedUploadUrl($contentType: String!) {
  getSignedUploadUrl(contentType: $contentType) {
    url
    key
  }
}
",
};

/// Create a book record.
pub const CREATE_BOOK: Operation = Operation {
    name: "createBook",
    document: r"
mutation createBook(
  $title: String!
  $subtitle: String
  $description: String
  $authors: [String!]!
  $language: String!
  $publishedDate: String
  $isbn10: String
  $isbn13: String
  $pageCount: Int
  $publisher: String
  $mature: Boolean!
  $physicalFormat: PhysicalFormat!
  $cover: String
) {
  createBook(
    title: $title
    subtitle: $subtitle
    description: $description
    authors: $authors
    language: $language
    publishedDate: $publishedDate
    isbn10: $isbn10
    isbn13: $isbn13
    pageCount: $pageCount
    publisher: $publisher
    mature: $mature
    physicalFormat: $physicalFormat
    cover: $cover
  ) {
    id
    slug
    title
  }
}
",
};

/// Introspect the mutations the schema offers.
pub const SCHEMA_MUTATIONS: Operation = Operation {
    name: "__schema",
    document: r"
{
  __schema {
    mutationType {
      fields {
        name
      }
    }
  }
}
",
};
