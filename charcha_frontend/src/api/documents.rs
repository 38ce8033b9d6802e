//! GraphQL documents sent by the client.

pub const SEND_OTP: &str = r#"
mutation SendVerificationOTP($email: String!, $type: OTPType!) {
  sendOtp(email: $email, type: $type) {
    success
    message
    channels
  }
}"#;

pub const VERIFY_OTP: &str = r#"
mutation VerifyPasswordResetOTP($email: String!, $otpCode: String!, $type: OTPType!) {
  verifyOtp(email: $email, otpCode: $otpCode, type: $type) {
    success
    message
    userInfo {
      email
      emailVerified
    }
  }
}"#;

pub const RESET_PASSWORD: &str = r#"
mutation ResetPassword($email: String!, $otpCode: String!, $newPassword: String!, $confirmPassword: String!) {
  resetPassword(email: $email, otpCode: $otpCode, newPassword: $newPassword, confirmPassword: $confirmPassword) {
    success
    message
    userInfo {
      email
      emailVerified
    }
  }
}"#;

pub const LOGIN: &str = r#"
mutation Login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    success
    token
    refreshToken
    message
    userInfo {
      id
      firstName
      lastName
      email
      phone
      profilePhoto
      role
      address
      latitude
      longitude
      bio
      isactive
      emailVerified
      phoneVerified
      createdAt
    }
  }
}"#;

pub const CREATE_USER: &str = r#"
mutation CreateUser(
  $firstName: String!
  $lastName: String!
  $email: String!
  $phone: String!
  $password: String!
  $role: String!
  $address: String!
  $latitude: Float!
  $longitude: Float!
  $bio: String!
) {
  createUser(
    firstName: $firstName
    lastName: $lastName
    email: $email
    phone: $phone
    password: $password
    role: $role
    address: $address
    latitude: $latitude
    longitude: $longitude
    bio: $bio
  ) {
    id
    firstName
    lastName
    email
    phone
    profilePhoto
    role
    address
    latitude
    longitude
    bio
    isactive
    emailVerified
    phoneVerified
    createdAt
  }
}"#;

pub const SEARCH_POSTS: &str = r#"
query SearchPosts($page: Int, $limit: Int) {
  searchPosts(page: $page, limit: $limit) {
    id
    userId
    userFirstName
    userLastName
    userRole
    title
    content
    visibility
    propertyType
    location
    mapLocation
    price
    status
    createdAt
    likeCount
    commentCount
    media {
      id
      mediaType
      mediaUrl
      mediaOrder
      mediaSize
      caption
      uploadedAt
    }
  }
}"#;

pub const POST_COMMENTS: &str = r#"
query PostComments($postId: Int!) {
  postComments(postId: $postId) {
    id
    userId
    userFirstName
    userLastName
    userRole
    comment
    status
    addedAt
    commentedAt
    likeCount
    replies {
      id
      userId
      userFirstName
      userLastName
      userRole
      comment
      status
      addedAt
      commentedAt
      likeCount
    }
  }
}"#;

pub const LIKE_POST: &str = r#"
mutation LikePost($postId: Int!, $userId: Int!) {
  likePost(postId: $postId, userId: $userId) {
    success
    message
    post {
      id
      likeCount
    }
  }
}"#;

pub const UNLIKE_POST: &str = r#"
mutation UnlikePost($postId: Int!, $userId: Int!) {
  unlikePost(postId: $postId, userId: $userId) {
    success
    message
    post {
      id
      likeCount
    }
  }
}"#;

pub const LIKE_COMMENT: &str = r#"
mutation LikeComment($commentId: Int!, $userId: Int!) {
  likeComment(commentId: $commentId, userId: $userId) {
    success
    message
    comment {
      id
      likeCount
    }
  }
}"#;

pub const UNLIKE_COMMENT: &str = r#"
mutation UnlikeComment($commentId: Int!, $userId: Int!) {
  unlikeComment(commentId: $commentId, userId: $userId) {
    success
    message
    comment {
      id
      likeCount
    }
  }
}"#;

pub const CREATE_COMMENT: &str = r#"
mutation CreateComment($postId: Int!, $userId: Int!, $comment: String!, $parentCommentId: Int!) {
  createComment(postId: $postId, userId: $userId, comment: $comment, parentCommentId: $parentCommentId) {
    success
    message
    comment {
      id
      parentCommentId
      comment
      addedAt
    }
  }
}"#;
